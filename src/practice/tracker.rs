use std::collections::BTreeSet;

use crate::keyboard::NoteId;

/// The set of notes currently sounding.
///
/// Drives the pressed look of the keys and lets the key-input path refuse to
/// re-trigger a note that is still held.
#[derive(Debug, Default, Clone)]
pub struct ActiveNotes {
    notes: BTreeSet<NoteId>,
}

impl ActiveNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `note` as sounding. Returns false if it already was.
    pub fn trigger(&mut self, note: NoteId) -> bool {
        self.notes.insert(note)
    }

    /// Mark `note` as silent. Releasing a note that is not active is a no-op.
    pub fn release(&mut self, note: NoteId) -> bool {
        self.notes.remove(&note)
    }

    pub fn is_active(&self, note: NoteId) -> bool {
        self.notes.contains(&note)
    }

    pub fn iter(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.notes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_then_release() {
        let mut active = ActiveNotes::new();
        assert!(active.trigger(NoteId(24)));
        assert!(active.is_active(NoteId(24)));

        assert!(active.release(NoteId(24)));
        assert!(active.is_empty());
    }

    #[test]
    fn double_trigger_keeps_one_entry() {
        let mut active = ActiveNotes::new();
        active.trigger(NoteId(1));
        assert!(!active.trigger(NoteId(1)));
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn releasing_an_inactive_note_is_a_no_op() {
        let mut active = ActiveNotes::new();
        active.trigger(NoteId(2));

        assert!(!active.release(NoteId(3)));
        assert!(!active.release(NoteId(3)));
        assert_eq!(active.iter().collect::<Vec<_>>(), vec![NoteId(2)]);
    }
}
