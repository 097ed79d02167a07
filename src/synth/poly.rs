use crate::{
    graph::node::GraphNode,
    synth::{
        factory::VoiceFactory,
        message::{MessageReceiver, ToneMessage},
        tone::ToneHandle,
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Pool occupancy snapshot, for display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoiceMeter {
    pub active: usize,
    pub capacity: usize,
    pub dropped: u64,
    /// Highest envelope level among sounding voices
    pub loudest: f32,
}

/// Fixed pool of voices, one per sounding tone instance.
///
/// Chords are just several voices at once. There is no stealing: when every
/// voice is busy a new tone is dropped and counted in [`dropped`](Self::dropped).
pub struct PolySynth<F: VoiceFactory, R: MessageReceiver> {
    voices: Vec<Voice<F::Voice>>,
    rx: R,
    sounding_samples: u64,
    temp_buffer: Vec<f32>,
    dropped: u64,
}

impl<F: VoiceFactory, R: MessageReceiver> PolySynth<F, R> {
    /// `sounding_samples` is the hard length of every tone instance.
    pub fn new(
        sample_rate: f32,
        max_voices: usize,
        sounding_samples: u64,
        factory: F,
        rx: R,
    ) -> Self {
        let voices = (0..max_voices)
            .map(|_| Voice::new(factory.create_voice(), sample_rate))
            .collect();

        Self {
            voices,
            rx,
            sounding_samples,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            dropped: 0,
        }
    }

    /// Render up to `MAX_BLOCK_SIZE` mono frames, overwriting `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        while let Some(msg) = self.rx.pop() {
            match msg {
                ToneMessage::Play { tone, frequency } => {
                    let sounding = self.sounding_samples;
                    match self.allocate_voice() {
                        Some(voice) => voice.start(tone, frequency, sounding),
                        None => self.dropped += 1,
                    }
                }
                ToneMessage::Stop { tone } => {
                    if let Some(voice) = self.find_voice(tone) {
                        voice.stop();
                    }
                }
                ToneMessage::StopAll => {
                    for voice in &mut self.voices {
                        voice.stop();
                    }
                }
            }
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            if voice.is_active() {
                let frames = &mut self.temp_buffer[..out.len()];
                voice.render(frames);

                for (o, v) in out.iter_mut().zip(frames.iter()) {
                    *o += v;
                }
            }
        }
    }

    pub fn meter(&self) -> VoiceMeter {
        let (active, loudest) = self
            .voices
            .iter()
            .filter(|v| v.is_active())
            .fold((0, 0.0f32), |(n, loudest), v| {
                (n + 1, loudest.max(v.get_envelope_level().unwrap_or(0.0)))
            });
        VoiceMeter {
            active,
            capacity: self.voices.len(),
            dropped: self.dropped,
            loudest,
        }
    }

    /// Number of voices currently sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Tones that arrived while the pool was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn allocate_voice(&mut self) -> Option<&mut Voice<F::Voice>> {
        self.voices.iter_mut().find(|v| v.is_free())
    }

    fn find_voice(&mut self, tone: ToneHandle) -> Option<&mut Voice<F::Voice>> {
        self.voices.iter_mut().find(|v| v.tone() == Some(tone))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{synth::tone::ToneShape, voices};

    fn synth(
        max_voices: usize,
        sounding: u64,
    ) -> PolySynth<impl VoiceFactory, VecDeque<ToneMessage>> {
        let shape = ToneShape::default();
        let factory = move || voices::piano(&shape);
        PolySynth::new(1_000.0, max_voices, sounding, factory, VecDeque::new())
    }

    fn play(tone: u64, frequency: f32) -> ToneMessage {
        ToneMessage::Play {
            tone: ToneHandle(tone),
            frequency,
        }
    }

    #[test]
    fn chords_use_one_voice_per_tone() {
        let mut synth = synth(4, 100);
        synth.rx.extend([play(0, 261.63), play(1, 329.63), play(2, 392.0)]);

        let mut out = [0.0f32; 16];
        synth.render_block(&mut out);

        assert_eq!(synth.active_voices(), 3);
        assert_eq!(synth.dropped(), 0);
    }

    #[test]
    fn full_pool_drops_instead_of_stealing() {
        let mut synth = synth(1, 100);
        synth.rx.extend([play(0, 261.63), play(1, 329.63)]);

        let mut out = [0.0f32; 16];
        synth.render_block(&mut out);

        assert_eq!(synth.active_voices(), 1);
        assert_eq!(synth.dropped(), 1);
        assert!(synth.find_voice(ToneHandle(0)).is_some());
    }

    #[test]
    fn stop_targets_a_single_instance() {
        let mut synth = synth(4, 100);
        synth.rx.extend([play(0, 261.63), play(1, 261.63)]);
        let mut out = [0.0f32; 8];
        synth.render_block(&mut out);

        synth.rx.push_back(ToneMessage::Stop { tone: ToneHandle(0) });
        synth.render_block(&mut out);

        assert_eq!(synth.active_voices(), 1);
        assert!(synth.find_voice(ToneHandle(1)).is_some());
    }

    #[test]
    fn voices_expire_after_the_sounding_window() {
        let mut synth = synth(2, 24);
        synth.rx.push_back(play(0, 440.0));

        let mut out = [0.0f32; 16];
        synth.render_block(&mut out);
        assert_eq!(synth.active_voices(), 1);

        synth.render_block(&mut out);
        assert_eq!(synth.active_voices(), 0);
        assert!(out[8..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn stop_all_silences_everything() {
        let mut synth = synth(4, 1_000);
        synth.rx.extend([play(0, 261.63), play(1, 329.63)]);
        let mut out = [0.0f32; 8];
        synth.render_block(&mut out);

        synth.rx.push_back(ToneMessage::StopAll);
        synth.render_block(&mut out);

        assert_eq!(synth.active_voices(), 0);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn meter_reports_occupancy() {
        let mut synth = synth(2, 1_000);
        synth.rx.extend([play(0, 261.63), play(1, 329.63), play(2, 392.0)]);
        let mut out = [0.0f32; 8];
        synth.render_block(&mut out);

        let meter = synth.meter();
        assert_eq!(meter.active, 2);
        assert_eq!(meter.capacity, 2);
        assert_eq!(meter.dropped, 1);
        assert!(meter.loudest > 0.0);
    }
}
