use crate::{
    graph::node::{GraphNode, RenderCtx},
    synth::tone::ToneHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,     // Available for allocation
    Sounding, // Inside its sounding window
}

/// A single voice that plays one tone instance through any GraphNode.
///
/// A voice is time-bounded: it frees itself once `remaining` samples have been
/// rendered, whatever its envelope is doing at that point.
pub struct Voice<T: GraphNode> {
    tone: Option<ToneHandle>,
    frequency: f32,
    state: VoiceState,
    remaining: u64,
    sample_rate: f32,
    graph: T,
}

impl<T: GraphNode> Voice<T> {
    pub fn new(graph: T, sample_rate: f32) -> Self {
        Self {
            tone: None,
            frequency: 0.0,
            state: VoiceState::Free,
            remaining: 0,
            sample_rate,
            graph,
        }
    }

    pub fn start(&mut self, tone: ToneHandle, frequency: f32, sounding_samples: u64) {
        self.tone = Some(tone);
        self.frequency = frequency;
        self.state = VoiceState::Sounding;
        self.remaining = sounding_samples;

        let ctx = RenderCtx::new(self.sample_rate, frequency);
        self.graph.note_on(&ctx);
    }

    /// Cut the voice off immediately.
    pub fn stop(&mut self) {
        if self.state == VoiceState::Sounding {
            let ctx = RenderCtx::new(self.sample_rate, self.frequency);
            self.graph.note_off(&ctx);
            self.free();
        }
    }

    /// Render into `out`, overwriting it. Samples past the end of the sounding
    /// window are left silent.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.state == VoiceState::Free {
            out.fill(0.0);
            return;
        }

        let ctx = RenderCtx::new(self.sample_rate, self.frequency);
        self.graph.render_block(out, &ctx);

        let frames = out.len() as u64;
        if frames >= self.remaining {
            out[self.remaining as usize..].fill(0.0);
            self.stop();
        } else {
            self.remaining -= frames;
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        self.state == VoiceState::Sounding
    }

    pub fn get_envelope_level(&self) -> Option<f32> {
        self.graph.get_envelope_level()
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.tone = None;
        self.remaining = 0;
    }

    pub fn tone(&self) -> Option<ToneHandle> {
        self.tone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    fn voice() -> Voice<impl GraphNode> {
        Voice::new(
            OscNode::square().amplify(EnvNode::exponential(0.5, 0.001, 1.5)),
            1_000.0,
        )
    }

    #[test]
    fn frees_itself_at_the_end_of_the_window() {
        let mut voice = voice();
        voice.start(ToneHandle(7), 100.0, 10);

        let mut out = [0.0f32; 16];
        voice.render(&mut out);

        assert!(out[..10].iter().all(|&s| s != 0.0));
        assert!(out[10..].iter().all(|&s| s == 0.0));
        assert!(voice.is_free());
        assert_eq!(voice.tone(), None);
    }

    #[test]
    fn window_spans_several_blocks() {
        let mut voice = voice();
        voice.start(ToneHandle(1), 100.0, 20);

        let mut out = [0.0f32; 8];
        voice.render(&mut out);
        voice.render(&mut out);
        assert!(voice.is_active());

        voice.render(&mut out);
        assert!(voice.is_free());
        assert!(out[..4].iter().all(|&s| s != 0.0));
        assert!(out[4..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn stop_cuts_immediately() {
        let mut voice = voice();
        voice.start(ToneHandle(3), 100.0, 1_000);
        voice.stop();

        let mut out = [1.0f32; 8];
        voice.render(&mut out);
        assert!(voice.is_free());
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
