use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase-Accumulating Oscillator
=============================

Every waveform here is a function of a single number: the phase, a value in
[0, 1) that says how far through one cycle we are. Each sample the phase moves
forward by

    increment = frequency / sample_rate

and wraps back into [0, 1). At 440 Hz and 48 kHz that is ~0.00917 per sample,
so one cycle takes ~109 samples.

Shapes (phase p in [0, 1)):

  Sine      sin(2π p)
  Triangle  1 - 4 |p - 0.5|          peaks at p = 0.5, troughs at 0 and 1
  Sawtooth  2p - 1                   ramps -1 → +1, then jumps back
  Square    +1 for p < 0.5, else -1

No band limiting is done. The keyboard tops out at C6 (~1 kHz), where the
aliasing of the naive saw and square is tolerable for a practice instrument.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorWaveform {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self { waveform, phase: 0.0 }
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
        self.waveform
    }

    /// Restart the cycle so every note instance begins at a zero crossing.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    fn sample_at(&self, phase: f32) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0,
            OscillatorWaveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Fill `destination` with consecutive samples at `ctx.frequency`.
    pub fn render(&mut self, destination: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;
        for sample in destination.iter_mut() {
            *sample = self.sample_at(self.phase);
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }
}
