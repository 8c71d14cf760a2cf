//! Posterior samples collected after burn-in
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::config::GibbsLdaConfig;
use crate::matrix::Matrix;

/// Posterior samples of a Gibbs run
///
/// Samples are appended in iteration order and never modified afterward.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct PosteriorSamples {
    z: Vec<Vec<usize>>,
    beta: Vec<Matrix>,
    theta: Vec<Matrix>,
}

impl PosteriorSamples {
    pub fn new() -> Self {
        PosteriorSamples::default()
    }

    /// Topic assignment vectors, one entry per word instance
    #[inline]
    pub fn z(&self) -> &[Vec<usize>] {
        &self.z
    }

    /// Topic-word distributions, `num_topics × vocab_size`. Each row is a
    /// Dirichlet draw.
    #[inline]
    pub fn beta(&self) -> &[Matrix] {
        &self.beta
    }

    /// Document-topic distributions, `num_topics × num_docs`. Each column is
    /// a Dirichlet draw.
    #[inline]
    pub fn theta(&self) -> &[Matrix] {
        &self.theta
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty() && self.beta.is_empty() && self.theta.is_empty()
    }

    /// Element-wise mean of the stored topic-word draws
    pub fn beta_mean(&self) -> Option<Matrix> {
        mean(&self.beta)
    }

    /// Element-wise mean of the stored document-topic draws
    pub fn theta_mean(&self) -> Option<Matrix> {
        mean(&self.theta)
    }

    pub(crate) fn push_z(&mut self, z: Vec<usize>) {
        self.z.push(z);
    }

    pub(crate) fn push_beta(&mut self, beta: Matrix) {
        self.beta.push(beta);
    }

    pub(crate) fn push_theta(&mut self, theta: Matrix) {
        self.theta.push(theta);
    }

    /// Empty samples with room for every draw `config` will store.
    /// Quantities that are not stored get no capacity.
    pub(crate) fn with_capacity_for(config: &GibbsLdaConfig) -> Self {
        let n_store = config.n_store_iters();
        let cap = |stored: bool| if stored { n_store } else { 0 };
        PosteriorSamples {
            z: Vec::with_capacity(cap(config.store_z)),
            beta: Vec::with_capacity(cap(config.store_beta)),
            theta: Vec::with_capacity(cap(config.store_theta)),
        }
    }
}

fn mean(mats: &[Matrix]) -> Option<Matrix> {
    let first = mats.first()?;
    let n = mats.len() as f64;
    let mut sum = Matrix::new(first.n_rows(), first.n_cols(), 0.0);
    mats.iter().for_each(|mat| {
        (0..mat.n_rows()).for_each(|r| {
            sum.row_mut(r)
                .iter_mut()
                .zip(mat.row(r))
                .for_each(|(s, x)| *s += x);
        })
    });
    (0..sum.n_rows()).for_each(|r| {
        sum.row_mut(r).iter_mut().for_each(|s| *s /= n);
    });
    Some(sum)
}
