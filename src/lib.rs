//! Collapsed Gibbs sampling for Latent Dirichlet Allocation
//!
//! `ldagibbs` runs a Markov chain over the topic assignment of every word
//! instance in a bag-of-words corpus. The topic-word and document-topic
//! distributions are integrated out during sampling and only materialized,
//! as Dirichlet draws from the current count tables, when posterior samples
//! are stored.
//!
//! # Example
//!
//! Two topics over a three word vocabulary
//!
//! ```
//! use ldagibbs::prelude::*;
//!
//! let corpus: Vec<Vec<(usize, u32)>> = vec![
//!     vec![(0, 2), (1, 1)],
//!     vec![(1, 1), (2, 3)],
//! ];
//!
//! let config = GibbsLdaConfig::new(2, 3, 1.0, 1.0, 5, 4)
//!     .with_store_z(true)
//!     .with_store_beta(true)
//!     .with_random_seed(42);
//!
//! let mut lda = GibbsLda::new(&corpus, config).unwrap();
//! let samples = lda.fit();
//!
//! assert_eq!(samples.z().len(), 1);
//! assert_eq!(samples.beta().len(), 1);
//! assert_eq!(samples.theta().len(), 0);
//! ```
//!
//! # Logging
//!
//! Progress is reported through the [`log`](https://docs.rs/log) facade.
//! Install any logger to see it.
// Test the README
#[cfg(doctest)]
mod readme_doctest {
    #[doc = include_str!("../README.md")]
    struct ReadMe;
}

#[macro_export]
macro_rules! impl_display {
    ($kind: ty) => {
        impl ::std::fmt::Display for $kind {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", String::from(self))
            }
        }
    };
}

pub mod config;
pub mod consts;
pub mod corpus;
pub mod dist;
pub mod gibbs;
pub mod matrix;
pub mod misc;
pub mod prelude;
pub mod report;
pub mod samples;
pub mod suffstats;
pub mod traits;
