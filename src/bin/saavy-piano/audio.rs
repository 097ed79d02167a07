//! Output device: a cpal stream rendering a PolySynth of piano voices

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, PushError, RingBuffer};
use saavy_piano::{
    synth::{PolySynth, SynthToneSource, ToneMessage, VoiceMeter},
    voices, PianoConfig, MAX_BLOCK_SIZE,
};

/// Samples per scope frame.
pub const SCOPE_LEN: usize = 1024;
const SCOPE_RING_BLOCKS: usize = 16;
/// Tone messages in flight between the UI thread and the audio callback.
const TONE_QUEUE: usize = 256;
const METER_QUEUE: usize = 8;

/// Keeps the stream alive; dropping it stops audio.
pub struct AudioEngine {
    _stream: cpal::Stream,
    pub sample_rate: f32,
}

/// What the UI reads back from the audio thread.
pub struct AudioFeeds {
    pub scope: Consumer<f32>,
    pub meter: Consumer<VoiceMeter>,
}

/// Open the default output device and start rendering.
///
/// Returns the running engine, the feeds for the UI and the tone source that
/// drives the synth.
pub fn start(config: &PianoConfig) -> EyreResult<(AudioEngine, AudioFeeds, SynthToneSource)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;
    log::info!(
        "audio: {} @ {sample_rate} Hz, {channels} channels, {} voices",
        device.name().unwrap_or_else(|_| "unknown device".into()),
        config.max_voices
    );

    let (tone_tx, tone_rx) = RingBuffer::<ToneMessage>::new(TONE_QUEUE);
    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_LEN * SCOPE_RING_BLOCKS);
    let (mut meter_tx, meter_rx) = RingBuffer::<VoiceMeter>::new(METER_QUEUE);

    let shape = config.tone;
    let factory = move || voices::piano(&shape);
    let mut synth = PolySynth::new(
        sample_rate,
        config.max_voices,
        shape.sounding_samples(sample_rate),
        factory,
        tone_rx,
    );

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut scope_tx = scope_tx;

    let stream = device
        .build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    let block = &mut render_buf[..frames_to_render];
                    synth.render_block(block);

                    // Duplicate mono to all channels
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    // Scope copy; drop the rest of the block if the UI is behind
                    for &s in block.iter() {
                        if let Err(PushError::Full(_)) = scope_tx.push(s) {
                            break;
                        }
                    }

                    frames_written += frames_to_render;
                }

                // One snapshot per callback; stale ones are skipped by the UI
                let _ = meter_tx.push(synth.meter());
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    Ok((
        AudioEngine {
            _stream: stream,
            sample_rate,
        },
        AudioFeeds {
            scope: scope_rx,
            meter: meter_rx,
        },
        SynthToneSource::new(tone_tx),
    ))
}
