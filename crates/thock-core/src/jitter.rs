use crate::constants::DEFAULT_JITTER;
use rand::Rng;

/// Uniform random source in `[0, 1)`.
///
/// Every `rand` generator qualifies, so a `StdRng::seed_from_u64` gives
/// reproducible output in tests while the front-ends seed from entropy.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Perturb `value` by a uniformly drawn factor in `[1 - amount, 1 + amount)`.
///
/// `amount == 0.0` returns `value` unchanged.
#[inline]
pub fn jitter<R: RandomSource + ?Sized>(rng: &mut R, value: f32, amount: f32) -> f32 {
    let u = rng.next_unit() - 0.5;
    (value as f64 * (1.0 + u * 2.0 * amount as f64)) as f32
}

#[inline]
pub fn jitter_default<R: RandomSource + ?Sized>(rng: &mut R, value: f32) -> f32 {
    jitter(rng, value, DEFAULT_JITTER)
}
