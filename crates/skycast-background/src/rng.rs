//! Random number source for particle spawning.

/// Uniform random draws used for spawn positions, wrap resets and lightning.
///
/// Implemented for [`fastrand::Rng`]; seed it with [`fastrand::Rng::with_seed`]
/// for reproducible animations.
pub trait RandomSource {
    /// A uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// A uniform sample in `[min, max)`.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl RandomSource for fastrand::Rng {
    fn next_f64(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
