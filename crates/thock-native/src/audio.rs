// ---------------- Native audio (cpal) ----------------

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thock_core::{AudioBackend, DeviceError, KeyGraph, Mixer, NoiseBuffer, ResumeOutcome};

/// Default output device driven by a shared [`Mixer`].
///
/// The mixer's sample clock is the device clock: graphs are scheduled
/// against it from the caller's thread and rendered on cpal's audio thread.
/// A stream error marks the backend stalled; the next key event restarts
/// playback through [`AudioBackend::resume`].
#[derive(Default)]
pub struct CpalBackend {
    mixer: RefCell<Option<Arc<Mutex<Mixer>>>>,
    stream: RefCell<Option<cpal::Stream>>,
    stalled: Arc<AtomicBool>,
}

impl CpalBackend {
    fn with_mixer<T>(&self, f: impl FnOnce(&mut Mixer) -> T) -> Option<T> {
        let mixer = self.mixer.borrow();
        let mut guard = mixer.as_ref()?.lock().ok()?;
        Some(f(&mut guard))
    }

    fn stream_error_handler(&self) -> impl FnMut(cpal::StreamError) + Send + 'static {
        stall_on_error(Arc::clone(&self.stalled))
    }
}

// Runs on cpal's audio thread; only flags the stall for the caller's thread
fn stall_on_error(
    stalled: Arc<AtomicBool>,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    move |err| {
        log::error!("audio stream error: {err}");
        stalled.store(true, Ordering::Release);
    }
}

impl AudioBackend for CpalBackend {
    fn open(&self) -> Result<f32, DeviceError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| DeviceError::Unsupported("no default output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| DeviceError::Unsupported(e.to_string()))?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate)));

        let err_fn = self.stream_error_handler();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), channels, Arc::clone(&mixer), err_fn)
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), channels, Arc::clone(&mixer), err_fn)
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), channels, Arc::clone(&mixer), err_fn)
            }
            other => {
                return Err(DeviceError::Unsupported(format!("sample format {other:?}")));
            }
        }
        .map_err(|e| DeviceError::Unsupported(e.to_string()))?;
        stream
            .play()
            .map_err(|e| DeviceError::Denied(e.to_string()))?;

        log::info!(
            "[native] {} @ {} Hz, {} ch",
            device.name().unwrap_or_else(|_| "output".into()),
            sample_rate,
            channels
        );
        *self.mixer.borrow_mut() = Some(mixer);
        *self.stream.borrow_mut() = Some(stream);
        self.stalled.store(false, Ordering::Release);
        Ok(sample_rate)
    }

    fn prepare_noise(&self, _noise: &NoiseBuffer) -> Result<(), DeviceError> {
        // the mixer reads the shared samples directly
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.stalled.load(Ordering::Acquire)
    }

    fn resume(&self) -> Result<ResumeOutcome, DeviceError> {
        let stream = self.stream.borrow();
        let Some(stream) = stream.as_ref() else {
            return Ok(ResumeOutcome::StillSuspended);
        };
        stream
            .play()
            .map_err(|e| DeviceError::Resume(e.to_string()))?;
        self.stalled.store(false, Ordering::Release);
        log::info!("[native] stream restarted");
        Ok(ResumeOutcome::Ready)
    }

    fn now(&self) -> f64 {
        self.with_mixer(|m| m.now()).unwrap_or(0.0)
    }

    fn submit(&self, graph: KeyGraph) {
        if self.with_mixer(|m| m.schedule(graph)).is_none() {
            log::warn!("[native] mixer unavailable, dropping key event");
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: Arc<Mutex<Mixer>>,
    err_fn: impl FnMut(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut scratch: Vec<f32> = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            scratch.resize(data.len(), 0.0);
            match mixer.lock() {
                Ok(mut m) => m.render_interleaved(&mut scratch, channels),
                Err(_) => scratch.fill(0.0),
            }
            for (out, s) in data.iter_mut().zip(scratch.iter()) {
                *out = T::from_sample(*s);
            }
        },
        err_fn,
        None,
    )
}
