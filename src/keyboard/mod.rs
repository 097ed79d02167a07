//! Static instrument data: which keys exist and which songs can be played.
//!
//! Both tables are built once at startup and shared read-only (behind an
//! `Arc`) with every component that needs them.

pub mod notes;
pub mod songs;

pub use notes::{KeyColor, Note, NoteId, NoteRegistry};
pub use songs::{Song, SongCatalog, SongId};

use crate::error::PianoError;

/// Width of one white key in layout units. Black keys sit on the boundary
/// between two white keys.
pub const WHITE_KEY_WIDTH: f32 = 1.0;

/// Note table plus song table.
#[derive(Debug, Clone)]
pub struct Keyboard {
    pub notes: NoteRegistry,
    pub songs: SongCatalog,
}

impl Keyboard {
    pub fn new(notes: NoteRegistry, songs: SongCatalog) -> Self {
        Self { notes, songs }
    }

    /// The C2–C6 keyboard with the preset songs.
    pub fn standard() -> Result<Self, PianoError> {
        let notes = NoteRegistry::standard();
        let songs = SongCatalog::standard(&notes)?;
        Ok(Self::new(notes, songs))
    }

    /// Top-centre of a key in layout units (x grows to the right, y is 0 at
    /// the top edge of the keys and negative above them).
    pub fn key_anchor(&self, id: NoteId) -> (f32, f32) {
        let whites = self.notes.white_keys_before(id) as f32;
        let x = match self.notes.get(id).map(|n| n.color) {
            Some(KeyColor::Black) => whites * WHITE_KEY_WIDTH,
            _ => (whites + 0.5) * WHITE_KEY_WIDTH,
        };
        (x, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_centre_white_keys_and_straddle_black_ones() {
        let keyboard = Keyboard::standard().unwrap();
        let c2 = keyboard.notes.find("C2").unwrap();
        let cs2 = keyboard.notes.find("C#2").unwrap();
        let d2 = keyboard.notes.find("D2").unwrap();

        assert_eq!(keyboard.key_anchor(c2), (0.5, 0.0));
        assert_eq!(keyboard.key_anchor(cs2), (1.0, 0.0));
        assert_eq!(keyboard.key_anchor(d2), (1.5, 0.0));
    }
}
