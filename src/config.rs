//! Sampler configuration
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MESSAGE_INTERVAL, DEFAULT_RANDOM_SEED, DEFAULT_SPACING,
};
use crate::impl_display;
use std::fmt;

/// Settings for a collapsed Gibbs sampling run
///
/// Required settings go through [`new`](GibbsLdaConfig::new); the rest have
/// defaults and `with_*` setters. Nothing is checked until
/// [`validate`](GibbsLdaConfig::validate), which the sampler calls on
/// construction.
///
/// # Example
///
/// ```rust
/// # use ldagibbs::config::{GibbsLdaConfig, HyperparameterError};
/// let config = GibbsLdaConfig::new(10, 5_000, 0.1, 0.01, 1_000, 500)
///     .with_spacing(10)
///     .with_store_beta(true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.random_seed, 1983);
///
/// let bad = config.with_burn_in_iter(1_000);
/// assert_eq!(
///     bad.validate(),
///     Err(HyperparameterError::BurnInTooHigh { burn_in_iter: 1_000, max_iter: 1_000 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct GibbsLdaConfig {
    /// Number of topics, K. Must be greater than 1.
    pub num_topics: usize,
    /// Number of words in the vocabulary, V. Must be greater than 1.
    pub vocab_size: usize,
    /// Symmetric Dirichlet weight on the document-topic distributions
    pub alpha: f64,
    /// Symmetric Dirichlet weight on the topic-word distributions
    pub eta: f64,
    /// Number of Gibbs iterations. Must be greater than 1.
    pub max_iter: usize,
    /// Iterations to run before samples are stored
    pub burn_in_iter: usize,
    /// Iterations between stored samples after burn-in
    pub spacing: usize,
    /// Store Dirichlet draws of the topic-word distributions
    pub store_beta: bool,
    /// Store Dirichlet draws of the document-topic distributions
    pub store_theta: bool,
    /// Store copies of the topic assignment vector
    pub store_z: bool,
    pub random_seed: u64,
    /// Iterations between progress log messages
    pub message_interval: usize,
}

impl GibbsLdaConfig {
    pub fn new(
        num_topics: usize,
        vocab_size: usize,
        alpha: f64,
        eta: f64,
        max_iter: usize,
        burn_in_iter: usize,
    ) -> Self {
        GibbsLdaConfig {
            num_topics,
            vocab_size,
            alpha,
            eta,
            max_iter,
            burn_in_iter,
            spacing: DEFAULT_SPACING,
            store_beta: false,
            store_theta: false,
            store_z: false,
            random_seed: DEFAULT_RANDOM_SEED,
            message_interval: DEFAULT_MESSAGE_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_burn_in_iter(mut self, burn_in_iter: usize) -> Self {
        self.burn_in_iter = burn_in_iter;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: usize) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_store_beta(mut self, store_beta: bool) -> Self {
        self.store_beta = store_beta;
        self
    }

    #[must_use]
    pub fn with_store_theta(mut self, store_theta: bool) -> Self {
        self.store_theta = store_theta;
        self
    }

    #[must_use]
    pub fn with_store_z(mut self, store_z: bool) -> Self {
        self.store_z = store_z;
        self
    }

    #[must_use]
    pub fn with_random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = random_seed;
        self
    }

    #[must_use]
    pub fn with_message_interval(mut self, message_interval: usize) -> Self {
        self.message_interval = message_interval;
        self
    }

    /// Check every precondition on the settings
    pub fn validate(&self) -> Result<(), HyperparameterError> {
        if self.num_topics < 2 {
            Err(HyperparameterError::NumTopicsTooLow {
                num_topics: self.num_topics,
            })
        } else if self.vocab_size < 2 {
            Err(HyperparameterError::VocabSizeTooLow {
                vocab_size: self.vocab_size,
            })
        } else if self.alpha <= 0.0 {
            Err(HyperparameterError::AlphaTooLow { alpha: self.alpha })
        } else if !self.alpha.is_finite() {
            Err(HyperparameterError::AlphaNotFinite { alpha: self.alpha })
        } else if self.eta <= 0.0 {
            Err(HyperparameterError::EtaTooLow { eta: self.eta })
        } else if !self.eta.is_finite() {
            Err(HyperparameterError::EtaNotFinite { eta: self.eta })
        } else if self.max_iter < 2 {
            Err(HyperparameterError::MaxIterTooLow {
                max_iter: self.max_iter,
            })
        } else if self.burn_in_iter >= self.max_iter {
            Err(HyperparameterError::BurnInTooHigh {
                burn_in_iter: self.burn_in_iter,
                max_iter: self.max_iter,
            })
        } else if self.spacing == 0 {
            Err(HyperparameterError::SpacingIsZero)
        } else {
            Ok(())
        }
    }

    /// Whether samples are collected at iteration `t`: at or past burn-in
    /// and a whole number of `spacing` steps after it.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use ldagibbs::config::GibbsLdaConfig;
    /// let config = GibbsLdaConfig::new(2, 2, 1.0, 1.0, 10, 3).with_spacing(2);
    /// let stored: Vec<usize> =
    ///     (0..10).filter(|&t| config.is_store_iter(t)).collect();
    /// assert_eq!(stored, vec![3, 5, 7, 9]);
    /// ```
    #[inline]
    pub fn is_store_iter(&self, t: usize) -> bool {
        t >= self.burn_in_iter && (t - self.burn_in_iter) % self.spacing == 0
    }

    /// The number of iterations at which samples are collected
    pub fn n_store_iters(&self) -> usize {
        (self.max_iter - self.burn_in_iter + self.spacing - 1) / self.spacing
    }

    /// The message interval used during a run. Intervals that would never
    /// fire (zero, or at least `max_iter`) fall back to every iteration.
    pub fn effective_message_interval(&self) -> usize {
        if self.message_interval == 0 || self.message_interval >= self.max_iter
        {
            1
        } else {
            self.message_interval
        }
    }
}

impl From<&GibbsLdaConfig> for String {
    fn from(config: &GibbsLdaConfig) -> String {
        format!(
            "GibbsLdaConfig(K: {}, V: {}, α: {}, η: {}, iters: {}, \
            burn-in: {}, spacing: {})",
            config.num_topics,
            config.vocab_size,
            config.alpha,
            config.eta,
            config.max_iter,
            config.burn_in_iter,
            config.spacing
        )
    }
}

impl_display!(GibbsLdaConfig);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum HyperparameterError {
    /// There must be at least two topics
    NumTopicsTooLow { num_topics: usize },
    /// There must be at least two words in the vocabulary
    VocabSizeTooLow { vocab_size: usize },
    /// alpha is less than or equal to zero
    AlphaTooLow { alpha: f64 },
    /// alpha is infinite or NaN
    AlphaNotFinite { alpha: f64 },
    /// eta is less than or equal to zero
    EtaTooLow { eta: f64 },
    /// eta is infinite or NaN
    EtaNotFinite { eta: f64 },
    /// There must be at least two iterations
    MaxIterTooLow { max_iter: usize },
    /// Burn-in must end before the last iteration
    BurnInTooHigh { burn_in_iter: usize, max_iter: usize },
    /// Spacing must be at least one
    SpacingIsZero,
}

impl std::error::Error for HyperparameterError {}

impl fmt::Display for HyperparameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumTopicsTooLow { num_topics } => {
                write!(f, "num_topics ({}) must be greater than 1", num_topics)
            }
            Self::VocabSizeTooLow { vocab_size } => {
                write!(f, "vocab_size ({}) must be greater than 1", vocab_size)
            }
            Self::AlphaTooLow { alpha } => {
                write!(f, "alpha ({}) must be greater than zero", alpha)
            }
            Self::AlphaNotFinite { alpha } => {
                write!(f, "alpha ({}) was non-finite", alpha)
            }
            Self::EtaTooLow { eta } => {
                write!(f, "eta ({}) must be greater than zero", eta)
            }
            Self::EtaNotFinite { eta } => {
                write!(f, "eta ({}) was non-finite", eta)
            }
            Self::MaxIterTooLow { max_iter } => {
                write!(f, "max_iter ({}) must be greater than 1", max_iter)
            }
            Self::BurnInTooHigh {
                burn_in_iter,
                max_iter,
            } => write!(
                f,
                "burn_in_iter ({}) must be less than max_iter ({})",
                burn_in_iter, max_iter
            ),
            Self::SpacingIsZero => write!(f, "spacing must be at least 1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_basic_impls;

    fn valid() -> GibbsLdaConfig {
        GibbsLdaConfig::new(2, 3, 1.0, 1.0, 5, 4)
    }

    test_basic_impls!(valid());

    #[test]
    fn defaults() {
        let config = valid();
        assert_eq!(config.spacing, 1);
        assert_eq!(config.random_seed, 1983);
        assert_eq!(config.message_interval, 100);
        assert!(!config.store_beta);
        assert!(!config.store_theta);
        assert!(!config.store_z);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn each_precondition_is_checked() {
        let cases = vec![
            (
                GibbsLdaConfig { num_topics: 1, ..valid() },
                HyperparameterError::NumTopicsTooLow { num_topics: 1 },
            ),
            (
                GibbsLdaConfig { vocab_size: 1, ..valid() },
                HyperparameterError::VocabSizeTooLow { vocab_size: 1 },
            ),
            (
                GibbsLdaConfig { alpha: 0.0, ..valid() },
                HyperparameterError::AlphaTooLow { alpha: 0.0 },
            ),
            (
                GibbsLdaConfig { alpha: f64::INFINITY, ..valid() },
                HyperparameterError::AlphaNotFinite { alpha: f64::INFINITY },
            ),
            (
                GibbsLdaConfig { eta: -1.0, ..valid() },
                HyperparameterError::EtaTooLow { eta: -1.0 },
            ),
            (
                GibbsLdaConfig { eta: f64::INFINITY, ..valid() },
                HyperparameterError::EtaNotFinite { eta: f64::INFINITY },
            ),
            (
                GibbsLdaConfig { max_iter: 1, burn_in_iter: 0, ..valid() },
                HyperparameterError::MaxIterTooLow { max_iter: 1 },
            ),
            (
                GibbsLdaConfig { burn_in_iter: 5, ..valid() },
                HyperparameterError::BurnInTooHigh {
                    burn_in_iter: 5,
                    max_iter: 5,
                },
            ),
            (
                valid().with_spacing(0),
                HyperparameterError::SpacingIsZero,
            ),
        ];

        cases.into_iter().for_each(|(config, err)| {
            assert_eq!(config.validate(), Err(err));
        });
    }

    #[test]
    fn nan_alpha_is_not_finite() {
        let config = GibbsLdaConfig { alpha: f64::NAN, ..valid() };
        assert!(matches!(
            config.validate(),
            Err(HyperparameterError::AlphaNotFinite { .. })
        ));
    }

    #[test]
    fn store_iters_without_spacing() {
        let config = valid();
        let stored: Vec<usize> =
            (0..config.max_iter).filter(|&t| config.is_store_iter(t)).collect();
        assert_eq!(stored, vec![4]);
        assert_eq!(config.n_store_iters(), 1);
    }

    #[test]
    fn n_store_iters_matches_is_store_iter() {
        for spacing in 1..6 {
            for burn_in_iter in 0..9 {
                let config = GibbsLdaConfig::new(2, 2, 1.0, 1.0, 10, burn_in_iter)
                    .with_spacing(spacing);
                let n = (0..10).filter(|&t| config.is_store_iter(t)).count();
                assert_eq!(n, config.n_store_iters());
            }
        }
    }

    #[test]
    fn message_interval_falls_back_to_every_iteration() {
        assert_eq!(valid().effective_message_interval(), 1);
        let config = GibbsLdaConfig::new(2, 2, 1.0, 1.0, 1_000, 0);
        assert_eq!(config.effective_message_interval(), 100);
        assert_eq!(
            config.with_message_interval(0).effective_message_interval(),
            1
        );
    }

    #[test]
    fn error_display() {
        let err = HyperparameterError::BurnInTooHigh {
            burn_in_iter: 10,
            max_iter: 10,
        };
        assert_eq!(
            err.to_string(),
            "burn_in_iter (10) must be less than max_iter (10)"
        );
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn serde_round_trip() {
        let config = valid().with_store_theta(true).with_random_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: GibbsLdaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
