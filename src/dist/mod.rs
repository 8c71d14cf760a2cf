//! Probability distributions used by the sampler
mod dirichlet;

pub use dirichlet::{
    Dirichlet, DirichletError, SymmetricDirichlet, SymmetricDirichletError,
};
