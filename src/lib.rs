pub mod config;
pub mod dsp;
pub mod engine; // Virtual clock and timers
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod keyboard; // Note and song tables
pub mod piano;
pub mod practice; // Auto-play, practice judge, note animations
pub mod synth; // Voice management and polyphony
pub mod voices;

pub use config::PianoConfig;
pub use error::PianoError;
pub use keyboard::{Keyboard, NoteId, SongId};
pub use piano::{Mode, NoteSource, Piano, PianoEvent};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
