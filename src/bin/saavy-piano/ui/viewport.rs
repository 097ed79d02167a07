//! Horizontal window onto the keyboard, measured in white keys

use saavy_piano::{
    keyboard::{KeyColor, Keyboard, WHITE_KEY_WIDTH},
    NoteId,
};

/// White keys per octave, for octave-sized scrolling.
const OCTAVE: isize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    first: usize,
    visible: usize,
    total: usize,
}

impl Viewport {
    /// Whole keyboard visible until the first resize.
    pub fn new(total: usize) -> Self {
        Self {
            first: 0,
            visible: total.max(1),
            total: total.max(1),
        }
    }

    /// Resize to `visible` white keys, keeping the left edge where possible.
    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.clamp(1, self.total);
        self.first = self.first.min(self.max_first());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let first = self.first as isize + delta;
        self.first = first.clamp(0, self.max_first() as isize) as usize;
    }

    pub fn scroll_octaves(&mut self, octaves: isize) {
        self.scroll_by(octaves * OCTAVE);
    }

    pub fn contains(&self, white_index: usize) -> bool {
        (self.first..self.first + self.visible).contains(&white_index)
    }

    /// Centre on `white_index` unless it is already on screen.
    pub fn scroll_into_view(&mut self, white_index: usize) {
        if self.contains(white_index) {
            return;
        }
        let first = white_index.saturating_sub(self.visible / 2);
        self.first = first.min(self.max_first());
    }

    /// White-key index in the middle of the window.
    pub fn centre(&self) -> usize {
        self.first + self.visible / 2
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    fn max_first(&self) -> usize {
        self.total - self.visible
    }
}

/// White-key index a note is drawn at. Black keys count as the white key to
/// their right, where most of their body sits on screen.
pub fn white_index(keyboard: &Keyboard, note: NoteId) -> usize {
    (keyboard.key_anchor(note).0 / WHITE_KEY_WIDTH) as usize
}

/// Octave of the white key at `white_index`.
pub fn octave_at(keyboard: &Keyboard, white_index: usize) -> Option<u8> {
    keyboard
        .notes
        .iter()
        .filter(|(_, note)| note.color == KeyColor::White)
        .nth(white_index)
        .map(|(_, note)| note.octave)
}
