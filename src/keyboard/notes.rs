/*
Note Registry
=============

The keyboard spans C2 to C6: four full octaves plus the top C, 49 keys. Each
key carries:

  name      "C4", "F#3", ... The sharp spelling is the only one used.
  freq      Equal temperament, A4 = 440 Hz, rounded to two decimals.
  trigger   The computer key that plays it.
  color     White (natural) or black (accidental).
  octave    Scientific pitch octave number.

Trigger Layout
--------------

The triggers walk the computer keyboard in one long run so every key on the
piano has one:

  octave 2   q 2 w 3 e r 5 t 6 y 7 u
  octave 3   i 9 o 0 p z s x d c f v
  octave 4   b h n j m , l . ; / ' a
  octave 5   k w s e d f t g y h u j
  octave 6   k

There are only so many keys, so octave 5 reuses triggers already taken lower
down ('w' is both D2 and C#5). Resolving a trigger takes the FIRST match in
table order, which makes those octave 5 entries reachable only by pointer or
by the auto-player. The duplication is deliberate table data; do not dedupe.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PianoError;

/// Index of a note in its [`NoteRegistry`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u16);

impl NoteId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub name: String,
    pub freq: f32,
    pub trigger: char,
    pub color: KeyColor,
    pub octave: u8,
}

impl Note {
    pub fn new(name: &str, freq: f32, trigger: char, color: KeyColor, octave: u8) -> Self {
        Self {
            name: name.to_owned(),
            freq,
            trigger,
            color,
            octave,
        }
    }

    pub fn is_accidental(&self) -> bool {
        self.color == KeyColor::Black
    }
}

use KeyColor::{Black, White};

const STANDARD_NOTES: &[(&str, f32, char, KeyColor, u8)] = &[
    // Octave 2
    ("C2", 65.41, 'q', White, 2),
    ("C#2", 69.3, '2', Black, 2),
    ("D2", 73.42, 'w', White, 2),
    ("D#2", 77.78, '3', Black, 2),
    ("E2", 82.41, 'e', White, 2),
    ("F2", 87.31, 'r', White, 2),
    ("F#2", 92.5, '5', Black, 2),
    ("G2", 98.0, 't', White, 2),
    ("G#2", 103.83, '6', Black, 2),
    ("A2", 110.0, 'y', White, 2),
    ("A#2", 116.54, '7', Black, 2),
    ("B2", 123.47, 'u', White, 2),
    // Octave 3
    ("C3", 130.81, 'i', White, 3),
    ("C#3", 138.59, '9', Black, 3),
    ("D3", 146.83, 'o', White, 3),
    ("D#3", 155.56, '0', Black, 3),
    ("E3", 164.81, 'p', White, 3),
    ("F3", 174.61, 'z', White, 3),
    ("F#3", 185.0, 's', Black, 3),
    ("G3", 196.0, 'x', White, 3),
    ("G#3", 207.65, 'd', Black, 3),
    ("A3", 220.0, 'c', White, 3),
    ("A#3", 233.08, 'f', Black, 3),
    ("B3", 246.94, 'v', White, 3),
    // Octave 4 (middle C)
    ("C4", 261.63, 'b', White, 4),
    ("C#4", 277.18, 'h', Black, 4),
    ("D4", 293.66, 'n', White, 4),
    ("D#4", 311.13, 'j', Black, 4),
    ("E4", 329.63, 'm', White, 4),
    ("F4", 349.23, ',', White, 4),
    ("F#4", 369.99, 'l', Black, 4),
    ("G4", 392.0, '.', White, 4),
    ("G#4", 415.3, ';', Black, 4),
    ("A4", 440.0, '/', White, 4),
    ("A#4", 466.16, '\'', Black, 4),
    ("B4", 493.88, 'a', White, 4),
    // Octave 5
    ("C5", 523.25, 'k', White, 5),
    ("C#5", 554.37, 'w', Black, 5),
    ("D5", 587.33, 's', White, 5),
    ("D#5", 622.25, 'e', Black, 5),
    ("E5", 659.25, 'd', White, 5),
    ("F5", 698.46, 'f', White, 5),
    ("F#5", 739.99, 't', Black, 5),
    ("G5", 783.99, 'g', White, 5),
    ("G#5", 830.61, 'y', Black, 5),
    ("A5", 880.0, 'h', White, 5),
    ("A#5", 932.33, 'u', Black, 5),
    ("B5", 987.77, 'j', White, 5),
    // Octave 6
    ("C6", 1046.5, 'k', White, 6),
];

/// Immutable table of every key on the piano, in ascending pitch order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct NoteRegistry {
    notes: Vec<Note>,
}

impl NoteRegistry {
    /// Build a registry from notes given in ascending pitch order.
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// The 49-key C2–C6 keyboard.
    pub fn standard() -> Self {
        Self::new(
            STANDARD_NOTES
                .iter()
                .map(|&(name, freq, trigger, color, octave)| {
                    Note::new(name, freq, trigger, color, octave)
                })
                .collect(),
        )
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(id.index())
    }

    /// Look a note up by name ("C4").
    pub fn find(&self, name: &str) -> Option<NoteId> {
        self.notes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NoteId(i as u16))
    }

    /// Resolve a physical trigger to a note. First match in table order wins.
    pub fn resolve_trigger(&self, trigger: char) -> Result<NoteId, PianoError> {
        let trigger = trigger.to_ascii_lowercase();
        self.notes
            .iter()
            .position(|n| n.trigger == trigger)
            .map(|i| NoteId(i as u16))
            .ok_or(PianoError::UnknownTrigger(trigger))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoteId, &Note)> {
        self.notes
            .iter()
            .enumerate()
            .map(|(i, n)| (NoteId(i as u16), n))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Name of a note, or "?" for an id from another registry.
    pub fn name(&self, id: NoteId) -> &str {
        self.get(id).map(|n| n.name.as_str()).unwrap_or("?")
    }

    /// Number of white keys strictly below `id`.
    pub fn white_keys_before(&self, id: NoteId) -> usize {
        self.notes
            .iter()
            .take(id.index())
            .filter(|n| n.color == KeyColor::White)
            .count()
    }

    pub fn white_key_count(&self) -> usize {
        self.notes.iter().filter(|n| n.color == KeyColor::White).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_keyboard_spans_c2_to_c6() {
        let registry = NoteRegistry::standard();

        assert_eq!(registry.len(), 49);
        assert_eq!(registry.white_key_count(), 29);
        let lowest = registry.get(NoteId(0)).unwrap();
        assert_eq!((lowest.name.as_str(), lowest.octave), ("C2", 2));
        let highest = registry.get(NoteId(48)).unwrap();
        assert_eq!((highest.name.as_str(), highest.octave), ("C6", 6));
    }

    #[test]
    fn a4_is_440() {
        let registry = NoteRegistry::standard();
        let a4 = registry.find("A4").and_then(|id| registry.get(id)).unwrap();
        assert_eq!(a4.freq, 440.0);
    }

    #[test]
    fn frequencies_ascend() {
        let registry = NoteRegistry::standard();
        let freqs: Vec<f32> = registry.iter().map(|(_, n)| n.freq).collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn shared_trigger_resolves_to_first_entry() {
        let registry = NoteRegistry::standard();

        // 'w' is bound to both D2 and C#5
        let id = registry.resolve_trigger('w').unwrap();
        assert_eq!(registry.name(id), "D2");

        // 'k' is bound to both C5 and C6
        let id = registry.resolve_trigger('k').unwrap();
        assert_eq!(registry.name(id), "C5");
    }

    #[test]
    fn triggers_are_case_insensitive() {
        let registry = NoteRegistry::standard();
        assert_eq!(registry.resolve_trigger('B'), registry.resolve_trigger('b'));
        assert_eq!(registry.name(registry.resolve_trigger('B').unwrap()), "C4");
    }

    #[test]
    fn unknown_trigger_is_rejected() {
        let registry = NoteRegistry::standard();
        assert_eq!(
            registry.resolve_trigger('1'),
            Err(PianoError::UnknownTrigger('1'))
        );
    }

    #[test]
    fn white_key_positions() {
        let registry = NoteRegistry::standard();
        let c4 = registry.find("C4").unwrap();
        let cs4 = registry.find("C#4").unwrap();

        assert_eq!(registry.white_keys_before(c4), 14);
        assert_eq!(registry.white_keys_before(cs4), 15);
    }
}
