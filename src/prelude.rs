pub use crate::config::{GibbsLdaConfig, HyperparameterError};
pub use crate::corpus::{CorpusError, WordInstances};
pub use crate::dist::{Dirichlet, SymmetricDirichlet};
pub use crate::gibbs::{FitStatus, GibbsLda, LdaError, Phase};
pub use crate::matrix::Matrix;
pub use crate::report::{print_topics, topic_summaries, IdToToken};
pub use crate::samples::PosteriorSamples;
pub use crate::suffstats::LdaSuffStat;
pub use crate::traits::*;
