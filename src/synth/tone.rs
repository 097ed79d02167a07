//! The tone source seam between the piano core and the audio engine.
//!
//! The core only ever asks for "a tone at this frequency" and later "stop that
//! tone". Whether that reaches a sound card, a test recorder or nowhere at all
//! is decided by the [`ToneSource`] it was built with.

use std::time::Duration;

#[cfg(feature = "rtrb")]
use rtrb::Producer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::OscillatorWaveform;
#[cfg(feature = "rtrb")]
use crate::synth::message::ToneMessage;

/// Identifies one sounding instance of a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneHandle(pub u64);

/// Sound design of a single struck note.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneShape {
    pub waveform: OscillatorWaveform,
    /// Gain at the strike.
    pub peak_gain: f32,
    /// Gain the exponential decay heads towards.
    pub floor_gain: f32,
    /// Time from peak to floor.
    pub decay: Duration,
    /// Hard limit after which the tone is stopped and the note counts as finished.
    pub sounding: Duration,
}

impl Default for ToneShape {
    fn default() -> Self {
        Self {
            waveform: OscillatorWaveform::Sine,
            peak_gain: 0.5,
            floor_gain: 0.001,
            decay: Duration::from_millis(1500),
            sounding: Duration::from_millis(1000),
        }
    }
}

impl ToneShape {
    /// Length of the sounding window in samples at `sample_rate`.
    pub fn sounding_samples(&self, sample_rate: f32) -> u64 {
        (self.sounding.as_secs_f64() * sample_rate as f64).round().max(1.0) as u64
    }
}

/// Something that can make a note audible.
///
/// `play` returns `None` when nothing will be heard (no device, muted output,
/// full queue). Callers must treat that as success: the rest of the piano keeps
/// running without sound.
pub trait ToneSource {
    fn play(&mut self, frequency: f32) -> Option<ToneHandle>;

    fn stop(&mut self, tone: ToneHandle);

    fn stop_all(&mut self) {}
}

impl ToneSource for Box<dyn ToneSource> {
    fn play(&mut self, frequency: f32) -> Option<ToneHandle> {
        (**self).play(frequency)
    }

    fn stop(&mut self, tone: ToneHandle) {
        (**self).stop(tone)
    }

    fn stop_all(&mut self) {
        (**self).stop_all()
    }
}

/// Used when the audio subsystem could not be opened.
#[derive(Debug, Default)]
pub struct SilentToneSource;

impl ToneSource for SilentToneSource {
    fn play(&mut self, _frequency: f32) -> Option<ToneHandle> {
        None
    }

    fn stop(&mut self, _tone: ToneHandle) {}
}

/// Sends tones to a [`PolySynth`](crate::synth::poly::PolySynth) running on
/// the audio thread.
#[cfg(feature = "rtrb")]
pub struct SynthToneSource {
    tx: Producer<ToneMessage>,
    next_handle: u64,
}

#[cfg(feature = "rtrb")]
impl SynthToneSource {
    pub fn new(tx: Producer<ToneMessage>) -> Self {
        Self { tx, next_handle: 0 }
    }
}

#[cfg(feature = "rtrb")]
impl ToneSource for SynthToneSource {
    fn play(&mut self, frequency: f32) -> Option<ToneHandle> {
        let tone = ToneHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        match self.tx.push(ToneMessage::Play { tone, frequency }) {
            Ok(()) => Some(tone),
            Err(_) => {
                log::warn!("tone queue full, dropping {frequency:.2} Hz");
                None
            }
        }
    }

    fn stop(&mut self, tone: ToneHandle) {
        // The voice frees itself at the end of its window, so a lost stop is harmless
        let _ = self.tx.push(ToneMessage::Stop { tone });
    }

    fn stop_all(&mut self) {
        let _ = self.tx.push(ToneMessage::StopAll);
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn handles_are_unique_per_instance() {
        let (tx, mut rx) = RingBuffer::<ToneMessage>::new(8);
        let mut source = SynthToneSource::new(tx);

        let a = source.play(261.63);
        let b = source.play(261.63);

        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);
        assert_eq!(
            rx.pop().ok(),
            Some(ToneMessage::Play {
                tone: ToneHandle(0),
                frequency: 261.63
            })
        );
    }

    #[test]
    fn full_queue_degrades_to_silence() {
        let (tx, _rx) = RingBuffer::<ToneMessage>::new(1);
        let mut source = SynthToneSource::new(tx);

        assert!(source.play(440.0).is_some());
        assert!(source.play(440.0).is_none());
    }

    #[test]
    fn default_shape_matches_a_struck_key() {
        let shape = ToneShape::default();
        assert_eq!(shape.peak_gain, 0.5);
        assert_eq!(shape.sounding_samples(48_000.0), 48_000);
    }
}
