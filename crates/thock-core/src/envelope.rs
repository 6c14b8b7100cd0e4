use crate::constants::RAMP_FLOOR;

/// One `setValueAtTime(peak, start)` followed by
/// `exponentialRampToValueAtTime(floor, end)`.
///
/// Times are absolute device-clock seconds. Evaluation follows WebAudio
/// automation: silent before `start_time`, geometric interpolation during
/// the ramp, `floor` held after `end_time`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpDecay {
    pub start_time: f64,
    pub peak: f32,
    pub floor: f32,
    pub end_time: f64,
}

impl ExpDecay {
    /// Ramp from `peak` to the inaudible floor over `decay_sec`.
    pub fn new(start_time: f64, peak: f32, decay_sec: f64) -> Self {
        Self::with_floor(start_time, peak, RAMP_FLOOR, decay_sec)
    }

    pub fn with_floor(start_time: f64, peak: f32, floor: f32, decay_sec: f64) -> Self {
        // exponential ramps are undefined at or across zero
        let floor = if floor > 0.0 { floor } else { RAMP_FLOOR };
        let peak = peak.max(floor);
        Self {
            start_time,
            peak,
            floor,
            end_time: start_time + decay_sec.max(0.0),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn gain_at(&self, t: f64) -> f32 {
        if t < self.start_time {
            return 0.0;
        }
        if t >= self.end_time {
            return self.floor;
        }
        let frac = (t - self.start_time) / self.duration();
        let ratio = self.floor as f64 / self.peak as f64;
        (self.peak as f64 * ratio.powf(frac)) as f32
    }
}
