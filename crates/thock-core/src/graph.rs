//! Declarative description of one keystroke's ephemeral signal graph.
//!
//! A `KeyGraph` is what the synthesizer hands to a renderer: a short list
//! of independent layers, each wired source -> optional bandpass -> gain
//! envelope -> output, with absolute start/stop times on the device clock.
//! The renderer owns every node it creates and releases them after
//! `stop_time`; nothing refers to a graph once it has been submitted.

use crate::envelope::ExpDecay;
use crate::noise::NoiseBuffer;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Bandpassed noise burst: the "thock".
    NoiseBody,
    /// Short sine at the body frequency. Press only.
    Thud,
    /// Square-wave tactile/clicky transient.
    Click,
}

/// Oscillator shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

#[derive(Clone, Debug)]
pub enum Source {
    Noise(NoiseBuffer),
    Oscillator { waveform: Waveform, frequency_hz: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bandpass {
    pub center_hz: f32,
    pub q: f32,
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub kind: LayerKind,
    pub source: Source,
    pub filter: Option<Bandpass>,
    pub envelope: ExpDecay,
    pub start_time: f64,
    pub stop_time: f64,
}

impl Layer {
    pub fn frequency_hz(&self) -> Option<f32> {
        match self.source {
            Source::Oscillator { frequency_hz, .. } => Some(frequency_hz),
            Source::Noise(_) => None,
        }
    }

    pub fn decay_sec(&self) -> f64 {
        self.envelope.duration()
    }
}

/// All layers produced by a single `play_down` / `play_up` call.
#[derive(Clone, Debug)]
pub struct KeyGraph {
    pub stroke: Stroke,
    pub switch_id: String,
    pub layers: SmallVec<[Layer; 3]>,
}

impl KeyGraph {
    pub fn new(stroke: Stroke, switch_id: &str) -> Self {
        Self {
            stroke,
            switch_id: switch_id.to_owned(),
            layers: SmallVec::new(),
        }
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    pub fn has_noise_body(&self) -> bool {
        self.layer(LayerKind::NoiseBody).is_some()
    }

    pub fn has_thud(&self) -> bool {
        self.layer(LayerKind::Thud).is_some()
    }

    pub fn has_click(&self) -> bool {
        self.layer(LayerKind::Click).is_some()
    }

    /// Earliest layer start; `None` for an empty graph.
    pub fn start_time(&self) -> Option<f64> {
        self.layers.iter().map(|l| l.start_time).reduce(f64::min)
    }

    /// Latest stop time across layers; `None` for an empty graph.
    pub fn end_time(&self) -> Option<f64> {
        self.layers.iter().map(|l| l.stop_time).reduce(f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
