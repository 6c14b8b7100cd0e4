//! Lazily opened audio device with a one-shot initialization guard.
//!
//! The platform audio API is abstracted behind [`AudioBackend`]. The
//! [`DeviceManager`] opens it at most once, builds the shared noise buffer
//! immediately afterwards and nudges a suspended device back to life on
//! every trigger. Failures never escape: callers get `None` and skip the
//! sound.

use crate::graph::KeyGraph;
use crate::jitter::RandomSource;
use crate::noise::NoiseBuffer;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    /// The host has no usable audio output. Permanent.
    #[error("audio output unsupported: {0}")]
    Unsupported(String),
    /// The host refused for now (e.g. no user gesture yet). Retried on the next trigger.
    #[error("audio output denied: {0}")]
    Denied(String),
    #[error("resume failed: {0}")]
    Resume(String),
    #[error("noise buffer upload failed: {0}")]
    Buffer(String),
}

/// Result of asking a suspended device to resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeOutcome {
    Ready,
    /// Resume was requested but has not completed (or needs a user gesture).
    StillSuspended,
}

/// Platform rendering capability.
///
/// Methods take `&self`; implementations keep whatever handles they need
/// behind interior mutability. `submit` hands over ownership of the graph:
/// the backend schedules it and releases every node after its stop time.
pub trait AudioBackend {
    /// Construct the rendering context and report its native sample rate.
    fn open(&self) -> Result<f32, DeviceError>;
    /// Make the shared noise buffer playable. Called once, right after `open`.
    fn prepare_noise(&self, noise: &NoiseBuffer) -> Result<(), DeviceError>;
    fn is_suspended(&self) -> bool;
    /// Fire-and-forget resume request. Must not block.
    fn resume(&self) -> Result<ResumeOutcome, DeviceError>;
    /// Current device clock in seconds.
    fn now(&self) -> f64;
    fn submit(&self, graph: KeyGraph);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    Uninitialized,
    Opening,
    Ready,
    Unavailable,
}

const UNINITIALIZED: u8 = 0;
const OPENING: u8 = 1;
const READY: u8 = 2;
const UNAVAILABLE: u8 = 3;

impl DeviceState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            OPENING => DeviceState::Opening,
            READY => DeviceState::Ready,
            UNAVAILABLE => DeviceState::Unavailable,
            _ => DeviceState::Uninitialized,
        }
    }
}

pub struct DeviceManager<B: AudioBackend> {
    backend: B,
    state: AtomicU8,
    sample_rate: OnceLock<f32>,
    noise: OnceLock<NoiseBuffer>,
}

/// A ready device, borrowed for the duration of one trigger call.
pub struct Device<'a, B: AudioBackend> {
    backend: &'a B,
    sample_rate: f32,
    noise: Option<&'a NoiseBuffer>,
}

impl<'a, B: AudioBackend> Device<'a, B> {
    pub fn now(&self) -> f64 {
        self.backend.now()
    }

    /// The shared noise buffer, absent if it could not be prepared.
    pub fn noise(&self) -> Option<&'a NoiseBuffer> {
        self.noise
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn submit(&self, graph: KeyGraph) {
        self.backend.submit(graph);
    }
}

impl<B: AudioBackend> DeviceManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: AtomicU8::new(UNINITIALIZED),
            sample_rate: OnceLock::new(),
            noise: OnceLock::new(),
        }
    }

    pub fn state(&self) -> DeviceState {
        DeviceState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn noise(&self) -> Option<&NoiseBuffer> {
        self.noise.get()
    }

    /// Open the device on first use, resume it if suspended, and return it.
    ///
    /// Idempotent and safe to call from many threads at once: only the caller
    /// that wins the `Uninitialized -> Opening` transition touches `open`.
    /// Returns `None` while another caller is opening, after a denied open
    /// (retried next time) and forever after an unsupported one.
    pub fn ensure_device<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<Device<'_, B>> {
        match self
            .state
            .compare_exchange(UNINITIALIZED, OPENING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => self.open(rng),
            Err(READY) => {}
            Err(OPENING) => {
                log::debug!("[device] open in progress, skipping sound");
                return None;
            }
            Err(_) => return None,
        }
        if self.state() != DeviceState::Ready {
            return None;
        }
        if self.backend.is_suspended() {
            match self.backend.resume() {
                Ok(outcome) => log::debug!("[device] resume requested: {:?}", outcome),
                Err(e) => log::warn!("[device] {}", e),
            }
        }
        let sample_rate = self.sample_rate.get().copied()?;
        Some(Device {
            backend: &self.backend,
            sample_rate,
            noise: self.noise.get(),
        })
    }

    fn open<R: RandomSource + ?Sized>(&self, rng: &mut R) {
        match self.backend.open() {
            Ok(sample_rate) => {
                _ = self.sample_rate.set(sample_rate);
                let noise = NoiseBuffer::generate(sample_rate, rng);
                match self.backend.prepare_noise(&noise) {
                    Ok(()) => {
                        _ = self.noise.set(noise);
                    }
                    Err(e) => log::warn!("[device] {}; noise body disabled", e),
                }
                log::info!("[device] opened at {} Hz", sample_rate);
                self.state.store(READY, Ordering::Release);
            }
            Err(e @ DeviceError::Denied(_)) => {
                log::warn!("[device] {}; will retry on next key", e);
                self.state.store(UNINITIALIZED, Ordering::Release);
            }
            Err(e) => {
                log::warn!("[device] {}; sound disabled", e);
                self.state.store(UNAVAILABLE, Ordering::Release);
            }
        }
    }
}
