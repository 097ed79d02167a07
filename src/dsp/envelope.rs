use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Exponential Decay Envelope
==========================

A struck piano string has no sustain: the hammer hits, the string is at its
loudest immediately, and the energy bleeds away. This envelope models exactly
that and nothing more.

Vocabulary
----------

  peak        Gain at the instant of note_on (0.5 by default, leaving headroom
              for chords).

  floor       The gain the curve is heading towards. It must be > 0 because an
              exponential never actually reaches zero.

  decay       Seconds to travel from peak to floor.


The Shape: Exponential
----------------------

  Level
  peak ┐╲
       │ ╲
       │  ╲_
       │    ╲__
       │       ╲____
 floor └────────────╲══════════→ Time
       note_on     decay

Each sample multiplies the level by a constant ratio, so the level drops by
the same number of decibels per second:

    level(t) = peak * (floor / peak) ^ (t / decay)
    ratio    = (floor / peak) ^ (1 / (decay * sample_rate))

Example: peak 0.5, floor 0.001, decay 1.5 s at 48 kHz
  - floor / peak = 0.002
  - ratio = 0.002 ^ (1 / 72000) ≈ 0.9999137
  - after 48000 samples (1 s): 0.5 * 0.002^(2/3) ≈ 0.0079

Once the floor is reached the envelope holds there until it is reset. Voices
are cut off after their sounding window anyway, so the hold is only heard if
the window is longer than the decay.


States
------

    ┌──────┐  note_on  ┌───────┐  level <= floor  ┌───────┐
    │ Idle │ ────────→ │ Decay │ ───────────────→ │ Floor │
    └──────┘           └───────┘                  └───────┘
       ↑                   │ note_off / reset         │
       └───────────────────┴──────────────────────────┘

note_off cuts straight to Idle. There is no release tail: the tone source
decides when a note stops sounding.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Decay,
    Floor,
}

pub struct Envelope {
    peak: f32,
    floor: f32,
    decay_time: f32,

    stage: EnvelopeState,
    level: f32,

    // Computed at note_on from the render sample rate
    ratio: f32,
}

impl Envelope {
    /// Piano-like defaults: 0.5 peak, 0.001 floor, 1.5 s decay.
    pub fn new() -> Self {
        Self::exponential(0.5, 0.001, 1.5)
    }

    pub fn exponential(peak: f32, floor: f32, decay: f32) -> Self {
        let peak = peak.clamp(0.0, 1.0);
        // The curve needs 0 < floor < peak to be well defined
        let floor = floor.clamp(f32::MIN_POSITIVE, peak.max(f32::MIN_POSITIVE));

        Self {
            peak,
            floor,
            decay_time: decay.max(MIN_TIME),
            stage: EnvelopeState::Idle,
            level: 0.0,
            ratio: 1.0,
        }
    }

    /// Strike: jump to peak and start decaying.
    pub fn note_on(&mut self, ctx: &RenderCtx) {
        let decay_samples = (self.decay_time * ctx.sample_rate).max(1.0);
        self.ratio = (self.floor / self.peak.max(f32::MIN_POSITIVE)).powf(1.0 / decay_samples);
        self.level = self.peak;
        self.stage = EnvelopeState::Decay;
    }

    /// Silence immediately.
    pub fn note_off(&mut self, _ctx: &RenderCtx) {
        self.reset();
    }

    /// Advance the envelope by one sample. Returns the level for that sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = self.level;
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Decay => {
                self.level *= self.ratio;
                if self.level <= self.floor {
                    self.level = self.floor;
                    self.stage = EnvelopeState::Floor;
                }
            }
            EnvelopeState::Floor => {}
        }
        out
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
