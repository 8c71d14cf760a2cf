//! Dirichlet and Symmetric Dirichlet distributions over simplexes
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::impl_display;
use crate::misc::{ln_multivariate_beta, logsumexp, vec_to_string};
use crate::traits::*;
use rand::distributions::Open01;
use rand::Rng;
use rand_distr::Gamma as RGamma;
use special::Gamma as _;
use std::fmt;

/// Symmetric [Dirichlet distribution](https://en.wikipedia.org/wiki/Dirichlet_distribution)
/// where all alphas are the same.
///
/// The LDA priors are symmetric: every document-topic distribution is drawn
/// from `SymmetricDirichlet { alpha, k: num_topics }` and every topic-word
/// distribution from `SymmetricDirichlet { alpha: eta, k: vocab_size }`.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SymmetricDirichlet {
    alpha: f64,
    k: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum SymmetricDirichletError {
    /// k parameter is zero
    KIsZero,
    /// alpha parameter(s) is less than or equal to zero
    AlphaTooLow { alpha: f64 },
    /// alpha parameter(s) is infinite or NaN
    AlphaNotFinite { alpha: f64 },
}

impl SymmetricDirichlet {
    /// Create a new symmetric Dirichlet distributon
    ///
    /// # Arguments
    /// - alpha: The Dirichlet weight.
    /// - k : The number of weights. `alpha` will be replicated `k` times.
    pub fn new(alpha: f64, k: usize) -> Result<Self, SymmetricDirichletError> {
        if k == 0 {
            Err(SymmetricDirichletError::KIsZero)
        } else if alpha <= 0.0 {
            Err(SymmetricDirichletError::AlphaTooLow { alpha })
        } else if !alpha.is_finite() {
            Err(SymmetricDirichletError::AlphaNotFinite { alpha })
        } else {
            Ok(SymmetricDirichlet { alpha, k })
        }
    }

    /// Create a new SymmetricDirichlet without checking whether the parmaeters
    /// are valid.
    #[inline]
    pub fn new_unchecked(alpha: f64, k: usize) -> Self {
        SymmetricDirichlet { alpha, k }
    }

    /// Get the alpha uniform weight parameter
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Get the number of weights, k
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// The prior weight vector, `alpha` replicated `k` times
    ///
    /// # Example
    ///
    /// ```rust
    /// # use ldagibbs::dist::SymmetricDirichlet;
    /// let symdir = SymmetricDirichlet::new(0.5, 3).unwrap();
    /// assert_eq!(symdir.weights(), vec![0.5, 0.5, 0.5]);
    /// ```
    pub fn weights(&self) -> Vec<f64> {
        vec![self.alpha; self.k]
    }

    /// Log of the multivariate Beta function of the weights,
    /// `k lnΓ(α) - lnΓ(kα)`
    pub fn ln_beta(&self) -> f64 {
        let kf = self.k as f64;
        self.alpha.ln_gamma().0 * kf - (self.alpha * kf).ln_gamma().0
    }
}

impl From<&SymmetricDirichlet> for String {
    fn from(symdir: &SymmetricDirichlet) -> String {
        format!("SymmetricDirichlet({}; α: {})", symdir.k, symdir.alpha)
    }
}

impl_display!(SymmetricDirichlet);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum DirichletError {
    /// alpha vector is empty
    AlphasEmpty,
    /// alphas parameter has one or more entries less than or equal to zero
    AlphaTooLow { ix: usize, alpha: f64 },
    /// alphas parameter has one or infinite or NaN entries
    AlphaNotFinite { ix: usize, alpha: f64 },
}

/// [Dirichlet distribution](https://en.wikipedia.org/wiki/Dirichlet_distribution)
/// over points on the k-simplex.
///
/// The sampler builds one of these from each row of the topic-word count
/// table and each column of the document-topic count table when it stores a
/// posterior sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Dirichlet {
    /// A `Vec` of real numbers in (0, ∞)
    alphas: Vec<f64>,
}

impl From<SymmetricDirichlet> for Dirichlet {
    fn from(symdir: SymmetricDirichlet) -> Self {
        Dirichlet::new_unchecked(symdir.weights())
    }
}

impl From<&SymmetricDirichlet> for Dirichlet {
    fn from(symdir: &SymmetricDirichlet) -> Self {
        Dirichlet::new_unchecked(symdir.weights())
    }
}

impl Dirichlet {
    /// Creates a `Dirichlet` with a given `alphas` vector
    ///
    /// # Example
    ///
    /// ```rust
    /// # use ldagibbs::dist::{Dirichlet, DirichletError};
    /// assert!(Dirichlet::new(vec![1.0, 2.5, 0.1]).is_ok());
    ///
    /// assert_eq!(
    ///     Dirichlet::new(vec![1.0, 0.0]),
    ///     Err(DirichletError::AlphaTooLow { ix: 1, alpha: 0.0 })
    /// );
    /// ```
    pub fn new(alphas: Vec<f64>) -> Result<Self, DirichletError> {
        if alphas.is_empty() {
            return Err(DirichletError::AlphasEmpty);
        }

        alphas.iter().enumerate().try_for_each(|(ix, &alpha)| {
            if alpha <= 0.0 {
                Err(DirichletError::AlphaTooLow { ix, alpha })
            } else if !alpha.is_finite() {
                Err(DirichletError::AlphaNotFinite { ix, alpha })
            } else {
                Ok(())
            }
        })?;

        Ok(Dirichlet { alphas })
    }

    /// Creates a new Dirichlet without checking whether the parameters are
    /// valid.
    #[inline]
    pub fn new_unchecked(alphas: Vec<f64>) -> Self {
        Dirichlet { alphas }
    }

    /// The length of `alphas` / the number of categories
    #[inline]
    pub fn k(&self) -> usize {
        self.alphas.len()
    }

    /// Get a reference to the weights vector, `alphas`
    #[inline]
    pub fn alphas(&self) -> &Vec<f64> {
        &self.alphas
    }

    /// Log of the multivariate Beta function of `alphas`
    pub fn ln_beta(&self) -> f64 {
        ln_multivariate_beta(&self.alphas)
    }
}

impl From<&Dirichlet> for String {
    fn from(dir: &Dirichlet) -> String {
        format!("Dir(α: {})", vec_to_string(&dir.alphas, 5))
    }
}

impl_display!(Dirichlet);

impl Rv<Vec<f64>> for Dirichlet {
    /// Normalized Gamma(α_i, 1) variates, drawn and normalized in log space
    /// so that rows made of tiny weights do not underflow to `0 / 0`.
    fn draw<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let ln_xs: Vec<f64> = self
            .alphas
            .iter()
            .map(|&alpha| ln_gamma_variate(alpha, rng))
            .collect();
        let ln_z = logsumexp(&ln_xs);
        ln_xs.iter().map(|ln_x| (ln_x - ln_z).exp()).collect()
    }
}

/// Log of a Gamma(`shape`, 1) variate.
///
/// For `shape < 1` the variate is `G(shape + 1) U^(1/shape)`, which is taken
/// in log space because `U^(1/shape)` underflows for small shapes.
fn ln_gamma_variate<R: Rng>(shape: f64, rng: &mut R) -> f64 {
    if shape < 1.0 {
        let g = rng.sample(RGamma::new(shape + 1.0, 1.0).unwrap());
        let u: f64 = rng.sample(Open01);
        g.ln() + u.ln() / shape
    } else {
        rng.sample(RGamma::new(shape, 1.0).unwrap()).ln()
    }
}

impl std::error::Error for SymmetricDirichletError {}
impl std::error::Error for DirichletError {}

impl fmt::Display for SymmetricDirichletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaTooLow { alpha } => {
                write!(f, "alpha ({}) must be greater than zero", alpha)
            }
            Self::AlphaNotFinite { alpha } => {
                write!(f, "alpha ({}) was non-finite", alpha)
            }
            Self::KIsZero => write!(f, "k must be greater than zero"),
        }
    }
}

impl fmt::Display for DirichletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphasEmpty => write!(f, "alphas vector was empty"),
            Self::AlphaTooLow { ix, alpha } => {
                write!(f, "Invalid alpha at index {}: {} <= 0.0", ix, alpha)
            }
            Self::AlphaNotFinite { ix, alpha } => {
                write!(f, "Non-finite alpha at index {}: {}", ix, alpha)
            }
        }
    }
}
