//! Biquad bandpass matching the WebAudio `BiquadFilterNode` "bandpass" type.
//!
//! Coefficients follow the Audio EQ Cookbook (constant 0 dB peak gain) and the
//! filter runs in Direct Form II Transposed, so the native mixer shapes the
//! noise body the same way the browser does.

use std::f64::consts::PI;

#[derive(Clone, Debug)]
pub struct BandpassFilter {
    b0: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl BandpassFilter {
    pub fn new(center_hz: f32, q: f32, sample_rate: f32) -> Self {
        let nyquist = sample_rate as f64 * 0.5;
        // keep the center strictly inside (0, nyquist) and Q away from zero
        let center = (center_hz as f64).clamp(1.0, nyquist * 0.999);
        let q = (q as f64).max(1e-4);
        let omega = 2.0 * PI * center / sample_rate as f64;
        let alpha = omega.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b2: -alpha / a0,
            a1: -2.0 * omega.cos() / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let x = x as f64;
        // b1 is zero for the bandpass
        let y = self.b0 * x + self.z1;
        self.z1 = -self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y as f32
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}
