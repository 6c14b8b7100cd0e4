//! Graph assembly for press and release strokes.
//!
//! Pure functions: given a profile, the device clock reading and the shared
//! noise buffer (if one exists yet), produce the layers to schedule. Every
//! layer starts at the same `now` so the stroke is heard as one event.

use crate::constants::*;
use crate::envelope::ExpDecay;
use crate::graph::{Bandpass, KeyGraph, Layer, LayerKind, Source, Stroke, Waveform};
use crate::jitter::{jitter, jitter_default, RandomSource};
use crate::noise::NoiseBuffer;
use crate::profile::SwitchProfile;

fn noise_body(noise: &NoiseBuffer, now: f64, filter: Bandpass, gain: f32, decay: f64) -> Layer {
    Layer {
        kind: LayerKind::NoiseBody,
        source: Source::Noise(noise.clone()),
        filter: Some(filter),
        envelope: ExpDecay::new(now, gain, decay),
        start_time: now,
        stop_time: now + decay + NOISE_STOP_PAD_SEC,
    }
}

fn click(now: f64, frequency_hz: f32, gain: f32, decay: f64) -> Layer {
    Layer {
        kind: LayerKind::Click,
        source: Source::Oscillator {
            waveform: Waveform::Square,
            frequency_hz,
        },
        filter: None,
        envelope: ExpDecay::new(now, gain, decay),
        start_time: now,
        stop_time: now + decay + CLICK_STOP_PAD_SEC,
    }
}

/// Full press: noise body, tonal thud and, for clicky/tactile switches, a click.
pub fn key_down<R: RandomSource + ?Sized>(
    profile: &SwitchProfile,
    switch_id: &str,
    now: f64,
    noise: Option<&NoiseBuffer>,
    rng: &mut R,
) -> KeyGraph {
    let mut graph = KeyGraph::new(Stroke::Down, switch_id);

    if let Some(noise) = noise {
        let filter = Bandpass {
            center_hz: jitter_default(rng, profile.filter_center_frequency),
            q: profile.filter_resonance,
        };
        let gain = jitter_default(rng, profile.master_volume);
        graph.layers.push(noise_body(
            noise,
            now,
            filter,
            gain,
            profile.body_decay_time as f64,
        ));
    }

    graph.layers.push(Layer {
        kind: LayerKind::Thud,
        source: Source::Oscillator {
            waveform: Waveform::Sine,
            frequency_hz: jitter_default(rng, profile.body_frequency),
        },
        filter: None,
        envelope: ExpDecay::new(now, profile.master_volume * THUD_GAIN, THUD_DECAY_SEC),
        start_time: now,
        stop_time: now + THUD_STOP_SEC,
    });

    if profile.has_click() {
        graph.layers.push(click(
            now,
            jitter(rng, profile.click_frequency, CLICK_JITTER),
            profile.master_volume * CLICK_GAIN,
            profile.click_decay_time as f64,
        ));
    }

    graph
}

/// Release: lighter and higher than the press, never a thud.
pub fn key_up<R: RandomSource + ?Sized>(
    profile: &SwitchProfile,
    switch_id: &str,
    now: f64,
    noise: Option<&NoiseBuffer>,
    rng: &mut R,
) -> KeyGraph {
    let mut graph = KeyGraph::new(Stroke::Up, switch_id);

    if let Some(noise) = noise {
        let filter = Bandpass {
            center_hz: jitter_default(rng, profile.filter_center_frequency * RELEASE_FILTER_SHIFT),
            q: profile.filter_resonance * RELEASE_Q_SCALE,
        };
        graph.layers.push(noise_body(
            noise,
            now,
            filter,
            profile.master_volume * RELEASE_BODY_GAIN,
            (profile.body_decay_time * RELEASE_DECAY_SCALE) as f64,
        ));
    }

    if profile.has_click() {
        graph.layers.push(click(
            now,
            jitter(rng, profile.click_frequency * RELEASE_CLICK_SHIFT, CLICK_JITTER),
            profile.master_volume * RELEASE_CLICK_GAIN,
            (profile.click_decay_time * RELEASE_CLICK_DECAY_SCALE) as f64,
        ));
    }

    graph
}
