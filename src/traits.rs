//! Core traits for localmart

/// A stream of uniformly distributed floats in `[0, 1)`
///
/// Derivation rules draw through this trait so tests can substitute scripted
/// draws. Implementations must be deterministic for a given starting state.
pub trait RandomSource {
    /// Return the next value in `[0, 1)` and advance the stream
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
