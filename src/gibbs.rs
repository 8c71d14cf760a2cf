//! Collapsed Gibbs sampler for Latent Dirichlet Allocation
//!
//! Every word instance carries a topic assignment. An iteration visits the
//! instances in corpus order and resamples each one's topic from its
//! conditional given every other assignment:
//!
//! ```text
//! p(z_i = k | z_-i, w) ∝ theta_counts[k, d] / (n_d - 1 + K α)
//!                        × beta_counts[k, w] / (topic_counts[k] + V η)
//! ```
//!
//! where the counts exclude instance `i` itself.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::config::{GibbsLdaConfig, HyperparameterError};
use crate::corpus::{BowEntry, CorpusError, WordInstances};
use crate::dist::{Dirichlet, SymmetricDirichlet};
use crate::matrix::Matrix;
use crate::misc::draw_multinomial;
use crate::samples::PosteriorSamples;
use crate::suffstats::LdaSuffStat;
use crate::traits::Rv;
use log::{debug, info, log_enabled, Level};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum LdaError {
    /// A sampler setting failed its precondition
    InvalidHyperparameter(HyperparameterError),
    /// The corpus has an out-of-range word id or a negative count
    InvalidCorpus(CorpusError),
}

impl From<HyperparameterError> for LdaError {
    fn from(err: HyperparameterError) -> Self {
        LdaError::InvalidHyperparameter(err)
    }
}

impl From<CorpusError> for LdaError {
    fn from(err: CorpusError) -> Self {
        LdaError::InvalidCorpus(err)
    }
}

impl std::error::Error for LdaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidHyperparameter(err) => Some(err),
            Self::InvalidCorpus(err) => Some(err),
        }
    }
}

impl fmt::Display for LdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHyperparameter(err) => {
                write!(f, "invalid hyperparameter: {}", err)
            }
            Self::InvalidCorpus(err) => write!(f, "invalid corpus: {}", err),
        }
    }
}

/// Where a sampler is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The corpus is loaded but no topics are assigned
    Uninitialized,
    /// Topics are assigned and no iteration has run
    Initialized,
    /// `iteration` is the next iteration to run
    Sampling { iteration: usize },
    /// All `max_iter` iterations have run
    Done,
}

/// How a cancellable run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// All iterations ran
    Completed,
    /// The run stopped before `iteration` started
    Cancelled { iteration: usize },
}

#[derive(Debug, Clone)]
struct Chain {
    stats: LdaSuffStat,
    topics: Vec<usize>,
    rng: Xoshiro256Plus,
    iteration: usize,
}

/// Collapsed Gibbs sampler for LDA with symmetric Dirichlet priors
///
/// # Example
///
/// Step through a chain by hand
///
/// ```
/// use ldagibbs::prelude::*;
///
/// let corpus = vec![
///     vec![(0_usize, 2_usize), (1, 1)],
///     vec![(1, 1), (2, 3)],
/// ];
/// let config = GibbsLdaConfig::new(2, 3, 1.0, 1.0, 5, 4).with_random_seed(42);
///
/// let mut lda = GibbsLda::new(corpus, config).unwrap();
/// assert_eq!(lda.phase(), Phase::Uninitialized);
///
/// lda.initialize_state();
/// assert_eq!(lda.phase(), Phase::Initialized);
///
/// lda.step();
/// assert_eq!(lda.phase(), Phase::Sampling { iteration: 1 });
///
/// let stats = lda.stats().unwrap();
/// assert_eq!(stats.topic_counts().iter().sum::<f64>(), 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct GibbsLda {
    config: GibbsLdaConfig,
    instances: WordInstances,
    /// `doc_length - 1 + K α` for every document
    doc_denom: Vec<f64>,
    chain: Option<Chain>,
    samples: PosteriorSamples,
    /// Scratch space for the per-topic conditional weights
    weights: Vec<f64>,
}

impl GibbsLda {
    /// Validate `config` and adapt `corpus` into word instances
    ///
    /// # Arguments
    /// - corpus: a sequence of documents, each a sequence of `(word, count)`
    ///   pairs with every word id in `[0, config.vocab_size)`.
    /// - config: the sampler settings
    pub fn new<C, D, E>(
        corpus: C,
        config: GibbsLdaConfig,
    ) -> Result<Self, LdaError>
    where
        C: IntoIterator<Item = D>,
        D: IntoIterator<Item = E>,
        E: BowEntry,
    {
        config.validate()?;
        let instances = WordInstances::from_bow(corpus, config.vocab_size)?;

        let k_alpha = config.num_topics as f64 * config.alpha;
        let doc_denom = instances
            .doc_lengths()
            .iter()
            .map(|&len| {
                if len == 0 {
                    // never read: the document owns no instances
                    f64::NAN
                } else {
                    len as f64 - 1.0 + k_alpha
                }
            })
            .collect();

        Ok(GibbsLda {
            weights: vec![0.0; config.num_topics],
            config,
            instances,
            doc_denom,
            chain: None,
            samples: PosteriorSamples::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &GibbsLdaConfig {
        &self.config
    }

    #[inline]
    pub fn instances(&self) -> &WordInstances {
        &self.instances
    }

    #[inline]
    pub fn num_docs(&self) -> usize {
        self.instances.num_docs()
    }

    /// The number of word instances in the corpus
    #[inline]
    pub fn num_words(&self) -> usize {
        self.instances.n()
    }

    #[inline]
    pub fn doc_lengths(&self) -> &[usize] {
        self.instances.doc_lengths()
    }

    pub fn phase(&self) -> Phase {
        match &self.chain {
            None => Phase::Uninitialized,
            Some(chain) if chain.iteration == 0 => Phase::Initialized,
            Some(chain) if chain.iteration < self.config.max_iter => {
                Phase::Sampling {
                    iteration: chain.iteration,
                }
            }
            Some(_) => Phase::Done,
        }
    }

    /// The number of completed iterations
    pub fn iteration(&self) -> usize {
        self.chain.as_ref().map_or(0, |chain| chain.iteration)
    }

    /// The count tables, once the state is initialized
    pub fn stats(&self) -> Option<&LdaSuffStat> {
        self.chain.as_ref().map(|chain| &chain.stats)
    }

    /// The current topic of every word instance, once the state is
    /// initialized
    pub fn topics(&self) -> Option<&[usize]> {
        self.chain.as_ref().map(|chain| chain.topics.as_slice())
    }

    /// Collapsed log joint of the current state
    pub fn ln_joint(&self) -> Option<f64> {
        self.stats().map(LdaSuffStat::ln_joint)
    }

    /// Topic-word point estimate from the current counts
    pub fn beta_mean(&self) -> Option<Matrix> {
        self.stats().map(LdaSuffStat::beta_mean)
    }

    /// Document-topic point estimate from the current counts
    pub fn theta_mean(&self) -> Option<Matrix> {
        self.stats().map(LdaSuffStat::theta_mean)
    }

    #[inline]
    pub fn samples(&self) -> &PosteriorSamples {
        &self.samples
    }

    pub fn into_samples(self) -> PosteriorSamples {
        self.samples
    }

    /// Seed the generator and draw an initial topic for every word instance
    ///
    /// Initial topics come from the multinomial implied by the symmetric
    /// document-topic prior, i.e. uniformly over topics. Calling this again
    /// restarts the chain and discards any stored samples.
    pub fn initialize_state(&mut self) {
        let config = &self.config;
        let mut rng = Xoshiro256Plus::seed_from_u64(config.random_seed);
        let mut stats = LdaSuffStat::new(
            config.num_topics,
            config.vocab_size,
            self.instances.num_docs(),
            config.alpha,
            config.eta,
        );

        let pvals =
            SymmetricDirichlet::new_unchecked(config.alpha, config.num_topics)
                .weights();
        let pvals_sum: f64 = pvals.iter().sum();

        let topics: Vec<usize> = self
            .instances
            .word_ids()
            .iter()
            .zip(self.instances.doc_ids())
            .map(|(&w, &d)| {
                let k = draw_multinomial(&pvals, pvals_sum, &mut rng);
                stats.observe(w, d, k);
                k
            })
            .collect();

        self.samples = PosteriorSamples::with_capacity_for(config);
        self.chain = Some(Chain {
            stats,
            topics,
            rng,
            iteration: 0,
        });
    }

    /// Run one Gibbs iteration
    ///
    /// Posterior draws of beta and theta, if stored this iteration, capture
    /// the state before the sweep. The topic assignment, if stored, captures
    /// the state after it.
    ///
    /// # Panics
    ///
    /// If the state is not initialized or all `max_iter` iterations have run
    pub fn step(&mut self) {
        let chain = match self.chain.as_mut() {
            Some(chain) => chain,
            None => panic!("state must be initialized before stepping"),
        };

        if chain.iteration >= self.config.max_iter {
            panic!(
                "all {} iterations have already run",
                self.config.max_iter
            );
        }

        let store = self.config.is_store_iter(chain.iteration);

        if store && self.config.store_beta {
            let beta = draw_beta(&chain.stats, &mut chain.rng);
            self.samples.push_beta(beta);
        }

        if store && self.config.store_theta {
            let theta = draw_theta(&chain.stats, &mut chain.rng);
            self.samples.push_theta(theta);
        }

        sweep(chain, &self.instances, &self.doc_denom, &mut self.weights);

        if store && self.config.store_z {
            self.samples.push_z(chain.topics.clone());
        }

        chain.iteration += 1;
    }

    /// Initialize the state and run all `max_iter` iterations
    pub fn fit(&mut self) -> &PosteriorSamples {
        self.fit_with_cancel(&AtomicBool::new(false));
        &self.samples
    }

    /// Like [`fit`](GibbsLda::fit), but stops before the next iteration once
    /// `cancel` is set. The flag is only read between iterations, so a
    /// cancelled sampler always holds a consistent state.
    pub fn fit_with_cancel(&mut self, cancel: &AtomicBool) -> FitStatus {
        self.initialize_state();

        let max_iter = self.config.max_iter;
        let message_interval = self.config.effective_message_interval();

        info!("Number of documents: {}", self.num_docs());
        info!("Number of words in the corpus: {}", self.num_words());
        info!("Maximum number of Gibbs iterations: {}", max_iter);
        info!("Burn in period: {}", self.config.burn_in_iter);
        info!("Message interval: {}", message_interval);

        for t in 0..max_iter {
            if cancel.load(Ordering::Relaxed) {
                info!("Gibbs sampling cancelled before iteration {}", t);
                return FitStatus::Cancelled { iteration: t };
            }

            self.step();

            if (t + 1) % message_interval == 0 && log_enabled!(Level::Debug) {
                let ln_joint = self.ln_joint().unwrap_or(f64::NAN);
                debug!("gibbs iter #{}: ln p(w, z) = {:.4}", t + 1, ln_joint);
            }
        }

        info!("Number of saved z samples: {}", self.samples.z().len());
        info!("Number of saved beta samples: {}", self.samples.beta().len());
        info!("Number of saved theta samples: {}", self.samples.theta().len());

        FitStatus::Completed
    }
}

/// Resample the topic of every word instance in corpus order
fn sweep(
    chain: &mut Chain,
    instances: &WordInstances,
    doc_denom: &[f64],
    weights: &mut [f64],
) {
    let Chain {
        stats, topics, rng, ..
    } = chain;

    let vocab_eta = stats.vocab_size() as f64 * stats.eta();

    let word_ids = instances.word_ids();
    let doc_ids = instances.doc_ids();

    for i in 0..topics.len() {
        let (w, d) = (word_ids[i], doc_ids[i]);

        // leave this instance out before computing its conditional
        stats.forget(w, d, topics[i]);

        let weight_sum =
            conditional_weights(stats, w, d, doc_denom[d], vocab_eta, weights);
        let k_new = draw_multinomial(weights, weight_sum, rng);

        stats.observe(w, d, k_new);
        topics[i] = k_new;
    }
}

/// Fill `weights` with the un-normalized conditional over topics for an
/// instance of `word` in `doc`, and return their sum. The instance must
/// already be removed from `stats`.
#[inline]
fn conditional_weights(
    stats: &LdaSuffStat,
    word: usize,
    doc: usize,
    doc_denom: f64,
    vocab_eta: f64,
    weights: &mut [f64],
) -> f64 {
    let beta_counts = stats.beta_counts();
    let theta_counts = stats.theta_counts();
    let topic_counts = stats.topic_counts();

    let mut weight_sum = 0.0;
    for (k, weight) in weights.iter_mut().enumerate() {
        *weight = (theta_counts[(k, doc)] / doc_denom)
            * (beta_counts[(k, word)] / (topic_counts[k] + vocab_eta));
        weight_sum += *weight;
    }
    weight_sum
}

fn posterior_dirichlet(alphas: Vec<f64>) -> Dirichlet {
    Dirichlet::new(alphas).unwrap_or_else(|err| {
        panic!("count table is not a valid Dirichlet weight: {}", err)
    })
}

/// One Dirichlet draw per topic from its row of topic-word counts
fn draw_beta<R: Rng>(stats: &LdaSuffStat, rng: &mut R) -> Matrix {
    let counts = stats.beta_counts();
    let mut beta = Matrix::new(counts.n_rows(), counts.n_cols(), 0.0);
    for k in 0..counts.n_rows() {
        let row = posterior_dirichlet(counts.row(k).to_vec()).draw(rng);
        beta.row_mut(k).copy_from_slice(&row);
    }
    beta
}

/// One Dirichlet draw per document from its column of document-topic counts
fn draw_theta<R: Rng>(stats: &LdaSuffStat, rng: &mut R) -> Matrix {
    let counts = stats.theta_counts();
    let mut theta = Matrix::new(counts.n_rows(), counts.n_cols(), 0.0);
    for d in 0..counts.n_cols() {
        let col = posterior_dirichlet(counts.col(d)).draw(rng);
        theta.set_col(d, &col);
    }
    theta
}
