//! Trait definitions
use rand::Rng;

/// Random variable
///
/// The sampler only ever draws from its distributions, so that is all this
/// asks of them.
pub trait Rv<X> {
    /// Single draw from the `Rv`
    fn draw<R: Rng>(&self, rng: &mut R) -> X;
}
