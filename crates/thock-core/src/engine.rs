use crate::device::{AudioBackend, Device, DeviceManager};
use crate::graph::KeyGraph;
use crate::jitter::RandomSource;
use crate::noise::NoiseBuffer;
use crate::profile::{ProfileTable, SwitchProfile};
use crate::synth::{key_down, key_up};
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;

type GraphBuilder<R> = fn(&SwitchProfile, &str, f64, Option<&NoiseBuffer>, &mut R) -> KeyGraph;

/// Keystroke sound engine.
///
/// Owns the profile table, the lazily opened device and the random source.
/// `play_down` / `play_up` are best-effort and fire-and-forget: they read the
/// device clock once, assemble a fresh graph, submit it and return. Nothing
/// is ever reported back to the caller.
///
/// Typical usage:
/// - Construct with `KeySynth::new(backend)` (or `with_rng` for a fixed seed)
/// - Call `play_down(id)` on key press and `play_up(id)` on release
pub struct KeySynth<B: AudioBackend, R: RandomSource = StdRng> {
    profiles: ProfileTable,
    device: DeviceManager<B>,
    rng: R,
}

impl<B: AudioBackend> KeySynth<B, StdRng> {
    pub fn new(backend: B) -> Self {
        Self::with_rng(backend, StdRng::from_entropy())
    }
}

impl<B: AudioBackend, R: RandomSource> KeySynth<B, R> {
    pub fn with_rng(backend: B, rng: R) -> Self {
        Self {
            profiles: ProfileTable::builtin(),
            device: DeviceManager::new(backend),
            rng,
        }
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    pub fn device(&self) -> &DeviceManager<B> {
        &self.device
    }

    pub fn backend(&self) -> &B {
        self.device.backend()
    }

    /// Open (first call) and resume (when suspended) the device.
    pub fn ensure_device(&mut self) -> Option<Device<'_, B>> {
        self.device.ensure_device(&mut self.rng)
    }

    /// Trigger a full key-press sound.
    pub fn play_down(&mut self, switch_id: &str) {
        self.play(switch_id, key_down);
    }

    /// Trigger a key-release sound.
    pub fn play_up(&mut self, switch_id: &str) {
        self.play(switch_id, key_up);
    }

    fn play(&mut self, switch_id: &str, build: GraphBuilder<R>) {
        let started = Instant::now();
        let Some(device) = self.device.ensure_device(&mut self.rng) else {
            return;
        };
        let profile = self.profiles.lookup(switch_id);
        let graph = build(&profile, switch_id, device.now(), device.noise(), &mut self.rng);
        let layers = graph.layers.len();
        let stroke = graph.stroke;
        device.submit(graph);
        log::trace!(
            "[synth] {:?} '{}' layers={} scheduled in {:?}",
            stroke,
            switch_id,
            layers,
            started.elapsed()
        );
    }
}
