use ldagibbs::prelude::*;
use proptest::prelude::*;

const TOL: f64 = 1E-9;

fn two_docs() -> Vec<Vec<(usize, usize)>> {
    vec![vec![(0, 2), (1, 1)], vec![(1, 1), (2, 3)]]
}

fn assert_conserved(lda: &GibbsLda) {
    let stats = lda.stats().unwrap();
    let config = lda.config();

    stats
        .topic_counts()
        .iter()
        .zip(stats.beta_counts().row_sums())
        .for_each(|(&ct, sum)| {
            assert::close(ct, sum - config.eta * config.vocab_size as f64, TOL)
        });

    lda.doc_lengths()
        .iter()
        .zip(stats.theta_counts().col_sums())
        .for_each(|(&len, sum)| {
            assert::close(
                sum - config.alpha * config.num_topics as f64,
                len as f64,
                TOL,
            )
        });

    assert::close(
        stats.topic_counts().iter().sum::<f64>(),
        lda.num_words() as f64,
        TOL,
    );
}

#[test]
fn two_document_end_to_end() {
    let config = GibbsLdaConfig::new(2, 3, 1.0, 1.0, 5, 4)
        .with_spacing(1)
        .with_store_z(true)
        .with_random_seed(42);

    let mut lda = GibbsLda::new(two_docs(), config).unwrap();
    let n_z = lda.fit().z().len();

    assert_eq!(n_z, 1);
    assert_eq!(lda.num_words(), 7);
    assert_eq!(lda.num_docs(), 2);
    assert_eq!(lda.samples().z()[0].len(), 7);
    assert_conserved(&lda);
}

#[test]
fn stored_beta_rows_sum_to_one_and_report() {
    let config = GibbsLdaConfig::new(2, 3, 0.5, 0.5, 50, 10)
        .with_spacing(5)
        .with_store_beta(true)
        .with_random_seed(7);

    let mut lda = GibbsLda::new(two_docs(), config).unwrap();
    let samples = lda.fit();
    assert_eq!(samples.beta().len(), 8);

    samples.beta().iter().for_each(|beta| {
        beta.row_sums()
            .iter()
            .for_each(|&s| assert::close(s, 1.0, TOL));
    });

    let id2token = vec!["human", "interface", "computer"];
    let lines = topic_summaries(&samples.beta()[0], &id2token, 3);
    assert_eq!(lines.len(), 2);
    lines
        .iter()
        .for_each(|line| assert_eq!(line.split(", ").count(), 2));

    let mean = samples.beta_mean().unwrap();
    mean.row_sums()
        .iter()
        .for_each(|&s| assert::close(s, 1.0, TOL));
}

#[test]
fn errors_surface_through_the_top_level_type() {
    let config = GibbsLdaConfig::new(2, 3, 1.0, 1.0, 5, 5);
    let err = GibbsLda::new(two_docs(), config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid hyperparameter: burn_in_iter (5) must be less than \
        max_iter (5)"
    );

    let config = GibbsLdaConfig::new(2, 3, 1.0, 1.0, 5, 4);
    let corpus = vec![vec![(0_i64, 1_i64)], vec![(2, -1)]];
    let err = GibbsLda::new(corpus, config).unwrap_err();
    assert_eq!(
        err,
        LdaError::InvalidCorpus(CorpusError::InvalidCount {
            doc_ix: 1,
            entry_ix: 0,
            count: -1.0,
        })
    );
}

fn arb_corpus() -> impl Strategy<Value = (usize, Vec<Vec<(usize, usize)>>)> {
    (2_usize..8).prop_flat_map(|vocab_size| {
        let doc = prop::collection::vec((0..vocab_size, 0_usize..5), 0..6);
        (Just(vocab_size), prop::collection::vec(doc, 1..6))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn counts_are_conserved_for_any_corpus(
        (vocab_size, corpus) in arb_corpus(),
        num_topics in 2_usize..5,
        alpha in 1E-4..2.0_f64,
        eta in 1E-4..2.0_f64,
        seed in any::<u64>(),
    ) {
        let config = GibbsLdaConfig::new(num_topics, vocab_size, alpha, eta, 6, 2)
            .with_store_beta(true)
            .with_store_theta(true)
            .with_store_z(true)
            .with_random_seed(seed);

        let mut lda = GibbsLda::new(&corpus, config).unwrap();
        lda.initialize_state();
        assert_conserved(&lda);

        while lda.phase() != Phase::Done {
            lda.step();
            assert_conserved(&lda);
            let stats = lda.stats().unwrap();
            prop_assert!(stats.topic_counts().iter().all(|&ct| ct >= 0.0));
            prop_assert!(stats.beta_counts().values().iter().all(|&x| x >= eta - TOL));
            prop_assert!(stats.theta_counts().values().iter().all(|&x| x >= alpha - TOL));
        }

        prop_assert_eq!(lda.samples().z().len(), 4);
        prop_assert_eq!(lda.samples().beta().len(), 4);
        prop_assert_eq!(lda.samples().theta().len(), 4);
    }

    #[test]
    fn stored_draws_are_on_the_simplex_for_tiny_hyperparameters(
        (vocab_size, corpus) in arb_corpus(),
        num_topics in 2_usize..5,
        ln_alpha in -14.0..-4.0_f64,
        ln_eta in -14.0..-4.0_f64,
        seed in any::<u64>(),
    ) {
        let config = GibbsLdaConfig::new(
            num_topics,
            vocab_size,
            ln_alpha.exp(),
            ln_eta.exp(),
            4,
            0,
        )
        .with_store_beta(true)
        .with_store_theta(true)
        .with_random_seed(seed);

        let mut lda = GibbsLda::new(&corpus, config).unwrap();
        let samples = lda.fit();

        for beta in samples.beta() {
            prop_assert!(beta.values().iter().all(|&x| x >= 0.0 && x.is_finite()));
            for s in beta.row_sums() {
                prop_assert!((s - 1.0).abs() < TOL);
            }
        }
        for theta in samples.theta() {
            prop_assert!(theta.values().iter().all(|&x| x >= 0.0 && x.is_finite()));
            for s in theta.col_sums() {
                prop_assert!((s - 1.0).abs() < TOL);
            }
        }
    }

    #[test]
    fn chains_are_reproducible_from_the_seed(
        (vocab_size, corpus) in arb_corpus(),
        seed in any::<u64>(),
    ) {
        let config = GibbsLdaConfig::new(3, vocab_size, 0.5, 0.1, 8, 0)
            .with_store_z(true)
            .with_store_beta(true)
            .with_random_seed(seed);

        let mut lda_a = GibbsLda::new(&corpus, config.clone()).unwrap();
        let mut lda_b = GibbsLda::new(&corpus, config).unwrap();
        lda_a.fit();
        lda_b.fit();

        prop_assert_eq!(lda_a.samples(), lda_b.samples());
        prop_assert_eq!(lda_a.topics(), lda_b.topics());
    }
}
