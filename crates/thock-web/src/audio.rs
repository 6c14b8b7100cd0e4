use std::cell::RefCell;
use thock_core::{
    AudioBackend, Bandpass, DeviceError, ExpDecay, KeyGraph, Layer, NoiseBuffer, ResumeOutcome,
    Source, Waveform,
};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// WebAudio renderer: every submitted layer becomes its own
/// source -> [bandpass] -> gain -> destination chain. The browser releases
/// the nodes once the source's scheduled stop has passed.
#[derive(Default)]
pub struct WebAudioBackend {
    ctx: RefCell<Option<web::AudioContext>>,
    noise: RefCell<Option<web::AudioBuffer>>,
}

impl WebAudioBackend {
    fn context(&self) -> Option<web::AudioContext> {
        self.ctx.borrow().clone()
    }
}

// Gain node carrying the layer's envelope: peak at start, exponential ramp to the floor
fn create_envelope_gain(
    audio_ctx: &web::AudioContext,
    env: &ExpDecay,
) -> Result<web::GainNode, ()> {
    let gain = web::GainNode::new(audio_ctx)
        .map_err(|e| {
            log::error!("GainNode error: {:?}", e);
        })
        .map_err(|_| ())?;
    let param = gain.gain();
    _ = param.set_value_at_time(env.peak, env.start_time);
    _ = param.exponential_ramp_to_value_at_time(env.floor, env.end_time);
    Ok(gain)
}

fn create_bandpass(audio_ctx: &web::AudioContext, bp: Bandpass) -> Result<web::BiquadFilterNode, ()> {
    let filter = web::BiquadFilterNode::new(audio_ctx)
        .map_err(|e| {
            log::error!("BiquadFilterNode error: {:?}", e);
        })
        .map_err(|_| ())?;
    filter.set_type(web::BiquadFilterType::Bandpass);
    filter.frequency().set_value(bp.center_hz);
    filter.q().set_value(bp.q);
    Ok(filter)
}

// Wire one layer: source -> [bandpass] -> gain -> destination, then schedule it
fn schedule_layer(
    audio_ctx: &web::AudioContext,
    noise: Option<&web::AudioBuffer>,
    layer: &Layer,
) -> Result<(), ()> {
    // shared buffer not uploaded: skip the body, keep the other layers
    if matches!(layer.source, Source::Noise(_)) && noise.is_none() {
        return Ok(());
    }
    let gain = create_envelope_gain(audio_ctx, &layer.envelope)?;

    let input: web::AudioNode = match &layer.filter {
        Some(bp) => {
            let filter = create_bandpass(audio_ctx, *bp)?;
            _ = filter.connect_with_audio_node(&gain);
            filter.into()
        }
        None => gain.clone().into(),
    };
    _ = gain.connect_with_audio_node(&audio_ctx.destination());

    match &layer.source {
        Source::Noise(_) => {
            let Some(buffer) = noise else {
                return Ok(());
            };
            let src = web::AudioBufferSourceNode::new(audio_ctx)
                .map_err(|e| {
                    log::error!("AudioBufferSourceNode error: {:?}", e);
                })
                .map_err(|_| ())?;
            src.set_buffer(Some(buffer));
            _ = src.connect_with_audio_node(&input);
            _ = src.start_with_when(layer.start_time);
            _ = src.stop_with_when(layer.stop_time);
        }
        Source::Oscillator {
            waveform,
            frequency_hz,
        } => {
            let src = web::OscillatorNode::new(audio_ctx)
                .map_err(|e| {
                    log::error!("OscillatorNode error: {:?}", e);
                })
                .map_err(|_| ())?;
            match waveform {
                Waveform::Sine => src.set_type(web::OscillatorType::Sine),
                Waveform::Square => src.set_type(web::OscillatorType::Square),
            }
            src.frequency().set_value(*frequency_hz);
            _ = src.connect_with_audio_node(&input);
            _ = src.start_with_when(layer.start_time);
            _ = src.stop_with_when(layer.stop_time);
        }
    }
    Ok(())
}

impl AudioBackend for WebAudioBackend {
    fn open(&self) -> Result<f32, DeviceError> {
        if let Some(ctx) = self.context() {
            return Ok(ctx.sample_rate());
        }
        let ctx = web::AudioContext::new()
            .map_err(|e| DeviceError::Unsupported(format!("{:?}", e)))?;
        let sample_rate = ctx.sample_rate();
        *self.ctx.borrow_mut() = Some(ctx);
        Ok(sample_rate)
    }

    fn prepare_noise(&self, noise: &NoiseBuffer) -> Result<(), DeviceError> {
        let ctx = self
            .context()
            .ok_or_else(|| DeviceError::Buffer("no audio context".into()))?;
        let buffer = ctx
            .create_buffer(1, noise.len() as u32, noise.sample_rate())
            .map_err(|e| DeviceError::Buffer(format!("{:?}", e)))?;
        let mut samples = noise.samples().to_vec();
        buffer
            .copy_to_channel(&mut samples, 0)
            .map_err(|e| DeviceError::Buffer(format!("{:?}", e)))?;
        *self.noise.borrow_mut() = Some(buffer);
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.context()
            .map(|ctx| ctx.state() == web::AudioContextState::Suspended)
            .unwrap_or(false)
    }

    fn resume(&self) -> Result<ResumeOutcome, DeviceError> {
        let ctx = self
            .context()
            .ok_or_else(|| DeviceError::Resume("no audio context".into()))?;
        let promise = ctx
            .resume()
            .map_err(|e| DeviceError::Resume(format!("{:?}", e)))?;
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!("[web] audio resumed"),
                Err(e) => log::warn!("[web] resume rejected: {:?}", e),
            }
        });
        Ok(ResumeOutcome::StillSuspended)
    }

    fn now(&self) -> f64 {
        self.context().map(|ctx| ctx.current_time()).unwrap_or(0.0)
    }

    fn submit(&self, graph: KeyGraph) {
        let Some(ctx) = self.context() else {
            return;
        };
        let noise = self.noise.borrow();
        for layer in &graph.layers {
            if schedule_layer(&ctx, noise.as_ref(), layer).is_err() {
                log::warn!("[web] dropped {:?} layer for '{}'", layer.kind, graph.switch_id);
            }
        }
    }
}
