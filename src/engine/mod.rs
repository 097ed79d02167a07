//! Timing for the single logical thread that drives the piano.

pub mod scheduler;

pub use scheduler::{Scheduler, TimerId};

use crate::{keyboard::NoteId, synth::ToneHandle};

/// Everything the piano ever waits for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timer {
    /// The auto-player's next step.
    Advance,
    /// A note's sounding window has elapsed.
    ToneFinished {
        note: NoteId,
        tone: Option<ToneHandle>,
    },
    /// One frame of the floating-note animation.
    AnimationTick,
}
