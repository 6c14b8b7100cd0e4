// Shared synthesis tuning constants used by both web and native frontends.

// Jitter
pub const DEFAULT_JITTER: f32 = 0.04; // +-4% per-event spread on most parameters
pub const CLICK_JITTER: f32 = 0.06; // clicks repeat most audibly, so spread them wider

// Noise body buffer
pub const NOISE_BUFFER_SECONDS: f64 = 0.1; // length of the shared noise burst
pub const NOISE_DECAY_FRACTION: f32 = 0.25; // envelope time constant as a fraction of buffer length

// Exponential ramps cannot reach zero; this is "inaudible"
pub const RAMP_FLOOR: f32 = 0.001;

// Press (key down)
pub const THUD_GAIN: f32 = 0.45; // x masterVolume
pub const THUD_DECAY_SEC: f64 = 0.04; // bottom-out thud is always short
pub const THUD_STOP_SEC: f64 = 0.05; // oscillator stop, relative to stroke start
pub const CLICK_GAIN: f32 = 0.25; // x masterVolume

// Release (key up)
pub const RELEASE_FILTER_SHIFT: f32 = 1.4;
pub const RELEASE_Q_SCALE: f32 = 0.8;
pub const RELEASE_BODY_GAIN: f32 = 0.35; // x masterVolume, not jittered
pub const RELEASE_DECAY_SCALE: f32 = 0.6;
pub const RELEASE_CLICK_SHIFT: f32 = 0.8;
pub const RELEASE_CLICK_GAIN: f32 = 0.15; // x masterVolume
pub const RELEASE_CLICK_DECAY_SCALE: f32 = 0.7;

// Sources keep running a little past their envelope end to avoid truncation clicks
pub const NOISE_STOP_PAD_SEC: f64 = 0.02;
pub const CLICK_STOP_PAD_SEC: f64 = 0.01;

// Switch identifier used when a lookup misses
pub const DEFAULT_SWITCH_ID: &str = "red";
