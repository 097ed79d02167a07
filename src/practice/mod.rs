//! Gameplay state: what is sounding, the auto-player, the practice judge and
//! the note animations. None of it touches audio directly.

pub mod judge;
pub mod sequencer;
pub mod tracker;
pub mod visuals;

pub use judge::{Judgement, PracticeJudge};
pub use sequencer::{AutoPlayer, PlaybackState, SequencerEvent};
pub use tracker::ActiveNotes;
pub use visuals::{NoteAnimation, NoteAnimations};
