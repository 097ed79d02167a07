use std::sync::Arc;

use crate::keyboard::{NoteId, Song};

/// Outcome of feeding one played note to the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// No song, or the song is already complete.
    Ignored,
    /// Not the expected note. The cursor stays where it was.
    Miss,
    /// Correct note; `cursor` is the next expected index.
    Advanced { cursor: usize },
    /// Correct note and it was the last one.
    Completed,
}

/// Tracks how far the player has got through a song by ear.
///
/// Wrong notes are free: they neither advance nor reset the cursor. Once the
/// last note is matched the cursor rests at `len` and further notes are
/// ignored until [`PracticeJudge::begin`] or [`PracticeJudge::reset`].
#[derive(Debug, Default, Clone)]
pub struct PracticeJudge {
    song: Option<Arc<Song>>,
    cursor: usize,
}

impl PracticeJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start judging `song` from its first note.
    pub fn begin(&mut self, song: Arc<Song>) {
        self.song = Some(song);
        self.cursor = 0;
    }

    /// Forget the song.
    pub fn clear(&mut self) {
        self.song = None;
        self.cursor = 0;
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn on_note_played(&mut self, note: NoteId) -> Judgement {
        let Some(song) = &self.song else {
            return Judgement::Ignored;
        };
        let Some(&expected) = song.notes().get(self.cursor) else {
            return Judgement::Ignored;
        };

        if note != expected {
            return Judgement::Miss;
        }

        self.cursor += 1;
        if self.cursor == song.len() {
            Judgement::Completed
        } else {
            Judgement::Advanced {
                cursor: self.cursor,
            }
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The note the player should play next.
    pub fn expected(&self) -> Option<NoteId> {
        self.song
            .as_ref()
            .and_then(|s| s.notes().get(self.cursor).copied())
    }

    pub fn song(&self) -> Option<&Arc<Song>> {
        self.song.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.song
            .as_ref()
            .is_some_and(|s| !s.is_empty() && self.cursor >= s.len())
    }
}
