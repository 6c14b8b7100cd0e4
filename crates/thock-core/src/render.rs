//! Sample-level renderer for submitted key graphs.
//!
//! The mixer keeps its own sample clock; that clock *is* the device clock
//! for the native and offline backends. Layers wait until their start time,
//! are evaluated per sample and are dropped once their stop time passes.

use crate::envelope::ExpDecay;
use crate::filter::BandpassFilter;
use crate::graph::{KeyGraph, LayerKind, Source, Waveform};
use crate::noise::NoiseBuffer;
use std::f32::consts::TAU;

enum Voice {
    Noise { buffer: NoiseBuffer, position: usize },
    Osc { waveform: Waveform, phase: f32, phase_inc: f32 },
}

struct ActiveLayer {
    kind: LayerKind,
    voice: Voice,
    filter: Option<BandpassFilter>,
    envelope: ExpDecay,
    start_time: f64,
    stop_time: f64,
}

impl ActiveLayer {
    fn next_sample(&mut self, t: f64) -> f32 {
        if t < self.start_time {
            return 0.0;
        }
        let raw = match &mut self.voice {
            Voice::Noise { buffer, position } => {
                let s = buffer.samples().get(*position).copied().unwrap_or(0.0);
                *position += 1;
                s
            }
            Voice::Osc {
                waveform,
                phase,
                phase_inc,
            } => {
                let s = match waveform {
                    Waveform::Sine => phase.sin(),
                    Waveform::Square => {
                        if *phase < std::f32::consts::PI {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                };
                *phase += *phase_inc;
                if *phase >= TAU {
                    *phase -= TAU;
                }
                s
            }
        };
        let shaped = match &mut self.filter {
            Some(f) => f.process(raw),
            None => raw,
        };
        shaped * self.envelope.gain_at(t)
    }
}

pub struct Mixer {
    sample_rate: f32,
    frames: u64,
    layers: Vec<ActiveLayer>,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: 0,
            layers: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Seconds rendered so far.
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn active_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn active_kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }

    pub fn schedule(&mut self, graph: KeyGraph) {
        for layer in graph.layers {
            let voice = match layer.source {
                Source::Noise(buffer) => Voice::Noise {
                    buffer,
                    position: 0,
                },
                Source::Oscillator {
                    waveform,
                    frequency_hz,
                } => Voice::Osc {
                    waveform,
                    phase: 0.0,
                    phase_inc: TAU * frequency_hz / self.sample_rate,
                },
            };
            let filter = layer
                .filter
                .map(|bp| BandpassFilter::new(bp.center_hz, bp.q, self.sample_rate));
            self.layers.push(ActiveLayer {
                kind: layer.kind,
                voice,
                filter,
                envelope: layer.envelope,
                start_time: layer.start_time,
                stop_time: layer.stop_time,
            });
        }
    }

    /// Render one mono sample and advance the clock.
    pub fn next_sample(&mut self) -> f32 {
        let t = self.now();
        let mut mix = 0.0f32;
        let mut i = 0usize;
        while i < self.layers.len() {
            if t >= self.layers[i].stop_time {
                self.layers.swap_remove(i);
                continue;
            }
            mix += self.layers[i].next_sample(t);
            i += 1;
        }
        self.frames += 1;
        mix.tanh()
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for s in out.iter_mut() {
            *s = self.next_sample();
        }
    }

    /// Fill an interleaved buffer, writing the same sample to every channel.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let s = self.next_sample();
            frame.fill(s);
        }
    }
}
