//! Hardware-free backend: records submitted graphs and renders them through
//! a [`Mixer`] on demand.

use crate::device::{AudioBackend, DeviceError, ResumeOutcome};
use crate::graph::KeyGraph;
use crate::noise::NoiseBuffer;
use crate::render::Mixer;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpenBehavior {
    Succeed,
    Unsupported,
    /// Deny the first attempt, succeed afterwards.
    DenyOnce,
}

pub struct OfflineBackend {
    sample_rate: f32,
    open_behavior: OpenBehavior,
    reject_noise: bool,
    suspended: AtomicBool,
    open_calls: AtomicUsize,
    resume_calls: AtomicUsize,
    submitted: Mutex<Vec<KeyGraph>>,
    prepared_noise: Mutex<Option<NoiseBuffer>>,
    mixer: Mutex<Mixer>,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            open_behavior: OpenBehavior::Succeed,
            reject_noise: false,
            suspended: AtomicBool::new(false),
            open_calls: AtomicUsize::new(0),
            resume_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            prepared_noise: Mutex::new(None),
            mixer: Mutex::new(Mixer::new(sample_rate)),
        }
    }

    /// Start in the suspended state; the first resume request wakes it.
    pub fn suspended(self) -> Self {
        self.suspended.store(true, Ordering::SeqCst);
        self
    }

    /// Every open fails permanently.
    pub fn unsupported(mut self) -> Self {
        self.open_behavior = OpenBehavior::Unsupported;
        self
    }

    /// The first open is denied, later ones succeed.
    pub fn denied_once(mut self) -> Self {
        self.open_behavior = OpenBehavior::DenyOnce;
        self
    }

    /// Refuse the noise buffer so graphs are built without a noise body.
    pub fn without_noise(mut self) -> Self {
        self.reject_noise = true;
        self
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    pub fn resume_calls(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }

    pub fn prepared_noise(&self) -> Option<NoiseBuffer> {
        lock(&self.prepared_noise).clone()
    }

    /// Copies of every graph submitted so far, oldest first.
    pub fn submitted(&self) -> Vec<KeyGraph> {
        lock(&self.submitted).clone()
    }

    pub fn take_submitted(&self) -> Vec<KeyGraph> {
        std::mem::take(&mut *lock(&self.submitted))
    }

    pub fn active_layers(&self) -> usize {
        lock(&self.mixer).active_layers()
    }

    /// Render `frames` mono samples, advancing the device clock.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        lock(&self.mixer).render(&mut out);
        out
    }
}

// A poisoned lock only means another test thread panicked mid-render; the data is still usable.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AudioBackend for OfflineBackend {
    fn open(&self) -> Result<f32, DeviceError> {
        let attempt = self.open_calls.fetch_add(1, Ordering::SeqCst);
        match self.open_behavior {
            OpenBehavior::Succeed => Ok(self.sample_rate),
            OpenBehavior::Unsupported => {
                Err(DeviceError::Unsupported("offline backend configured without output".into()))
            }
            OpenBehavior::DenyOnce if attempt == 0 => {
                Err(DeviceError::Denied("waiting for user gesture".into()))
            }
            OpenBehavior::DenyOnce => Ok(self.sample_rate),
        }
    }

    fn prepare_noise(&self, noise: &NoiseBuffer) -> Result<(), DeviceError> {
        if self.reject_noise {
            return Err(DeviceError::Buffer("noise rejected".into()));
        }
        *lock(&self.prepared_noise) = Some(noise.clone());
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }

    fn resume(&self) -> Result<ResumeOutcome, DeviceError> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        self.suspended.store(false, Ordering::SeqCst);
        Ok(ResumeOutcome::Ready)
    }

    fn now(&self) -> f64 {
        lock(&self.mixer).now()
    }

    fn submit(&self, graph: KeyGraph) {
        lock(&self.submitted).push(graph.clone());
        lock(&self.mixer).schedule(graph);
    }
}
