//! The shared, pre-shaped noise burst behind every noise-body layer.

use crate::constants::{NOISE_BUFFER_SECONDS, NOISE_DECAY_FRACTION};
use crate::jitter::RandomSource;
use std::sync::Arc;

/// Mono noise burst with a baked-in exponential decay.
///
/// Cloning shares the sample data; every key event reads the same samples.
#[derive(Clone, Debug)]
pub struct NoiseBuffer {
    sample_rate: f32,
    samples: Arc<[f32]>,
}

/// Buffer length in samples for a device running at `sample_rate`.
#[inline]
pub fn noise_len(sample_rate: f32) -> usize {
    (sample_rate as f64 * NOISE_BUFFER_SECONDS).round() as usize
}

/// Envelope multiplier for sample `i` of an `n`-sample buffer: 1.0 at the
/// first sample, decaying with a time constant of a quarter of the buffer.
#[inline]
pub fn noise_envelope(i: usize, n: usize) -> f32 {
    (-(i as f32) / (n as f32 * NOISE_DECAY_FRACTION)).exp()
}

impl NoiseBuffer {
    pub fn generate<R: RandomSource + ?Sized>(sample_rate: f32, rng: &mut R) -> Self {
        let n = noise_len(sample_rate);
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                let white = (rng.next_unit() * 2.0 - 1.0) as f32;
                white * noise_envelope(i, n)
            })
            .collect();
        Self {
            sample_rate,
            samples: samples.into(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_sec(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True when both handles point at the same underlying samples.
    pub fn same_buffer(&self, other: &NoiseBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}
