//! Sufficient statistics of an LDA topic assignment
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::consts::COUNT_FLOOR_TOL;
use crate::dist::SymmetricDirichlet;
use crate::matrix::Matrix;
use crate::misc::ln_multivariate_beta;

/// Count tables for the topic assignments of every word instance.
///
/// The Dirichlet smoothing constants are stored in the tables themselves:
/// every topic-word entry starts at `eta` and every document-topic entry at
/// `alpha`, and each assigned instance adds one to its entries. The tables are
/// updated one instance at a time with [`observe`](LdaSuffStat::observe) and
/// [`forget`](LdaSuffStat::forget), so the following hold after every
/// complete update:
///
/// - `topic_counts[k] == Σ_w beta_counts[k, w] - eta * vocab_size`
/// - `Σ_k theta_counts[k, d] == alpha * num_topics + doc_length[d]`
/// - `Σ_k topic_counts[k] == n`
///
/// # Example
///
/// ```rust
/// # use ldagibbs::suffstats::LdaSuffStat;
/// let mut stat = LdaSuffStat::new(2, 3, 1, 0.5, 0.1);
///
/// stat.observe(2, 0, 1);
/// assert_eq!(stat.n(), 1);
/// assert_eq!(stat.topic_counts(), &[0.0, 1.0]);
/// assert!((stat.beta_counts()[(1, 2)] - 1.1).abs() < 1E-12);
/// assert!((stat.theta_counts()[(1, 0)] - 1.5).abs() < 1E-12);
///
/// stat.forget(2, 0, 1);
/// assert_eq!(stat.n(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct LdaSuffStat {
    alpha: f64,
    eta: f64,
    n: usize,
    /// `num_topics × vocab_size`
    beta_counts: Matrix,
    /// `num_topics × num_docs`
    theta_counts: Matrix,
    topic_counts: Vec<f64>,
}

impl LdaSuffStat {
    /// Empty tables holding only the smoothing constants
    pub fn new(
        num_topics: usize,
        vocab_size: usize,
        num_docs: usize,
        alpha: f64,
        eta: f64,
    ) -> Self {
        LdaSuffStat {
            alpha,
            eta,
            n: 0,
            beta_counts: Matrix::new(num_topics, vocab_size, eta),
            theta_counts: Matrix::new(num_topics, num_docs, alpha),
            topic_counts: vec![0.0; num_topics],
        }
    }

    #[inline]
    pub fn num_topics(&self) -> usize {
        self.topic_counts.len()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.beta_counts.n_cols()
    }

    #[inline]
    pub fn num_docs(&self) -> usize {
        self.theta_counts.n_cols()
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// The number of assigned instances
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Smoothed topic-word counts, `num_topics × vocab_size`
    #[inline]
    pub fn beta_counts(&self) -> &Matrix {
        &self.beta_counts
    }

    /// Smoothed document-topic counts, `num_topics × num_docs`
    #[inline]
    pub fn theta_counts(&self) -> &Matrix {
        &self.theta_counts
    }

    /// The number of instances assigned to each topic
    #[inline]
    pub fn topic_counts(&self) -> &[f64] {
        &self.topic_counts
    }

    /// Assign an instance of `word` in `doc` to `topic`
    #[inline]
    pub fn observe(&mut self, word: usize, doc: usize, topic: usize) {
        self.n += 1;
        self.beta_counts[(topic, word)] += 1.0;
        self.theta_counts[(topic, doc)] += 1.0;
        self.topic_counts[topic] += 1.0;
    }

    /// Remove an instance of `word` in `doc` from `topic`
    ///
    /// # Panics
    ///
    /// If no instance of `word` in `doc` is assigned to `topic`. The tables
    /// would go below their smoothing floor, which means the caller's
    /// assignments and the tables have diverged.
    #[inline]
    pub fn forget(&mut self, word: usize, doc: usize, topic: usize) {
        self.n -= 1;

        let beta = &mut self.beta_counts[(topic, word)];
        *beta -= 1.0;
        if *beta - self.eta < -COUNT_FLOOR_TOL {
            panic!(
                "topic-word count ({}, {}) fell below its floor: {}",
                topic, word, beta
            );
        }

        let theta = &mut self.theta_counts[(topic, doc)];
        *theta -= 1.0;
        if *theta - self.alpha < -COUNT_FLOOR_TOL {
            panic!(
                "document-topic count ({}, {}) fell below its floor: {}",
                topic, doc, theta
            );
        }

        let total = &mut self.topic_counts[topic];
        *total -= 1.0;
        if *total < 0.0 {
            panic!("topic count {} fell below zero: {}", topic, total);
        }
    }

    /// Collapsed log joint `ln p(w, z | alpha, eta)` of the current
    /// assignment, with the topic-word and document-topic distributions
    /// integrated out.
    ///
    /// Each topic contributes `ln B(beta_counts[k, :]) - ln B(eta, ..., eta)`
    /// and each document `ln B(theta_counts[:, d]) - ln B(alpha, ..., alpha)`,
    /// where `B` is the multivariate Beta function.
    pub fn ln_joint(&self) -> f64 {
        let num_topics = self.num_topics();
        let topic_prior =
            SymmetricDirichlet::new_unchecked(self.eta, self.vocab_size());
        let doc_prior = SymmetricDirichlet::new_unchecked(self.alpha, num_topics);

        let ln_p_w = (0..num_topics)
            .map(|k| ln_multivariate_beta(self.beta_counts.row(k)))
            .sum::<f64>()
            - num_topics as f64 * topic_prior.ln_beta();

        let ln_p_z = (0..self.num_docs())
            .map(|d| ln_multivariate_beta(&self.theta_counts.col(d)))
            .sum::<f64>()
            - self.num_docs() as f64 * doc_prior.ln_beta();

        ln_p_w + ln_p_z
    }

    /// Posterior mean of the topic-word distributions, each row of
    /// `beta_counts` normalized.
    pub fn beta_mean(&self) -> Matrix {
        let mut mean = self.beta_counts.clone();
        (0..mean.n_rows()).for_each(|k| {
            let row = mean.row_mut(k);
            let z: f64 = row.iter().sum();
            row.iter_mut().for_each(|x| *x /= z);
        });
        mean
    }

    /// Posterior mean of the document-topic distributions, each column of
    /// `theta_counts` normalized.
    pub fn theta_mean(&self) -> Matrix {
        let mut mean = self.theta_counts.clone();
        let zs = mean.col_sums();
        (0..mean.n_rows()).for_each(|k| {
            mean.row_mut(k)
                .iter_mut()
                .zip(zs.iter())
                .for_each(|(x, z)| *x /= z);
        });
        mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_basic_impls;

    const TOL: f64 = 1E-12;

    test_basic_impls!(LdaSuffStat::new(2, 3, 4, 0.1, 0.01));

    #[test]
    fn new_holds_only_smoothing() {
        let stat = LdaSuffStat::new(2, 3, 4, 0.1, 0.01);
        assert_eq!(stat.n(), 0);
        assert!(stat.beta_counts().values().iter().all(|&x| x == 0.01));
        assert!(stat.theta_counts().values().iter().all(|&x| x == 0.1));
        assert_eq!(stat.topic_counts(), &[0.0, 0.0]);
        assert_eq!(stat.num_topics(), 2);
        assert_eq!(stat.vocab_size(), 3);
        assert_eq!(stat.num_docs(), 4);
    }

    #[test]
    fn observe_then_forget_restores_tables() {
        let mut stat = LdaSuffStat::new(3, 4, 2, 0.5, 0.25);
        let start = stat.clone();
        stat.observe(3, 1, 2);
        stat.observe(0, 0, 2);
        stat.forget(0, 0, 2);
        stat.forget(3, 1, 2);
        assert_eq!(stat, start);
    }

    #[test]
    fn conservation_after_updates() {
        let (alpha, eta) = (0.3, 0.1);
        let mut stat = LdaSuffStat::new(2, 3, 2, alpha, eta);
        let assignments = [(0, 0, 1), (2, 0, 0), (2, 1, 0), (1, 1, 1)];
        assignments
            .iter()
            .for_each(|&(w, d, k)| stat.observe(w, d, k));
        stat.forget(2, 0, 0);
        stat.observe(2, 0, 1);

        let row_sums = stat.beta_counts().row_sums();
        stat.topic_counts().iter().zip(row_sums.iter()).for_each(
            |(&ct, &sum)| assert::close(ct, sum - eta * 3.0, TOL),
        );

        let col_sums = stat.theta_counts().col_sums();
        assert::close(col_sums[0] - alpha * 2.0, 2.0, TOL);
        assert::close(col_sums[1] - alpha * 2.0, 2.0, TOL);
        assert::close(stat.topic_counts().iter().sum::<f64>(), 4.0, TOL);
    }

    #[test]
    #[should_panic]
    fn forget_unassigned_instance_panics() {
        let mut stat = LdaSuffStat::new(2, 3, 1, 1.0, 1.0);
        stat.observe(0, 0, 0);
        stat.forget(1, 0, 0);
    }

    #[test]
    fn ln_joint_single_instance() {
        // one instance: p(w) = 1/V and p(z) = 1/K under the symmetric priors
        let mut stat = LdaSuffStat::new(2, 3, 1, 1.0, 1.0);
        stat.observe(1, 0, 0);
        assert::close(stat.ln_joint(), -(3.0_f64.ln()) - 2.0_f64.ln(), TOL);
    }

    #[test]
    fn ln_joint_of_empty_tables_is_zero() {
        let stat = LdaSuffStat::new(4, 5, 3, 0.2, 0.05);
        assert::close(stat.ln_joint(), 0.0, 1E-10);
    }

    #[test]
    fn means_are_normalized() {
        let mut stat = LdaSuffStat::new(2, 3, 2, 0.5, 0.5);
        stat.observe(0, 0, 0);
        stat.observe(0, 1, 0);
        stat.observe(2, 1, 1);

        stat.beta_mean()
            .row_sums()
            .iter()
            .for_each(|&s| assert::close(s, 1.0, TOL));
        stat.theta_mean()
            .col_sums()
            .iter()
            .for_each(|&s| assert::close(s, 1.0, TOL));

        // topic 0 row: [2.5, 0.5, 0.5] / 3.5
        assert::close(stat.beta_mean()[(0, 0)], 2.5 / 3.5, TOL);
    }
}
