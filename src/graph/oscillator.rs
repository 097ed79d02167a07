use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

The oscillator is the only sound source of the piano. It produces a repeating
waveform at the frequency carried in the RenderCtx, and the envelope it is
multiplied with turns that into a struck, decaying note.

Waveform Character:
-------------------

Sine: The purest tone - a single frequency with no harmonics.
  - Sound: Smooth, round, a soft electric piano
  - This is the default and what the keyboard was tuned by ear against

Triangle: Odd harmonics falling off as 1/n².
  - Sound: Slightly brighter, mellow, music-box like

Sawtooth: All harmonics, falling off as 1/n.
  - Sound: Bright and buzzy, cuts through a chord

Square: Odd harmonics, falling off as 1/n.
  - Sound: Hollow, chiptune

Example usage:
  let osc = OscNode::sine();
  let voice = OscNode::sine().amplify(EnvNode::exponential(0.5, 0.001, 1.5));
*/

pub struct OscNode {
    osc: OscillatorBlock,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
    }
}
