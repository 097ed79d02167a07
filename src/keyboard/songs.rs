use std::{sync::Arc, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::PianoError,
    keyboard::notes::{NoteId, NoteRegistry},
    practice::sequencer::MIN_SPEED,
};

/// Shortest gap ever put between two auto-play steps, so the clock always
/// moves forward however fast the song is played.
pub const MIN_STEP: Duration = Duration::from_millis(1);

fn step_from_ms(ms: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(ms / 1000.0)
        .ok()
        .map(|step| step.max(MIN_STEP))
}

/// Index of a song in its [`SongCatalog`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SongId(pub usize);

/// A melody: notes, per-note lengths in beats, and a tempo.
///
/// Only constructible through [`Song::new`], which guarantees the two
/// sequences line up and every note exists on the keyboard.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    name: String,
    notes: Vec<NoteId>,
    durations: Vec<f64>,
    tempo: f64,
}

impl Song {
    pub fn new(
        name: &str,
        notes: &[&str],
        durations: &[f64],
        tempo: f64,
        registry: &NoteRegistry,
    ) -> Result<Self, PianoError> {
        if notes.len() != durations.len() {
            return Err(PianoError::MismatchedDurations {
                song: name.to_owned(),
                notes: notes.len(),
                durations: durations.len(),
            });
        }
        // Every wait must stay schedulable down to the slowest speed
        if !(tempo.is_finite() && tempo > 0.0)
            || step_from_ms(60_000.0 / tempo / MIN_SPEED).is_none()
        {
            return Err(PianoError::InvalidTempo {
                song: name.to_owned(),
            });
        }
        let beat_ms = 60_000.0 / tempo;
        if let Some(index) = durations.iter().position(|d| {
            !(d.is_finite() && *d > 0.0) || step_from_ms(d * beat_ms / MIN_SPEED).is_none()
        }) {
            return Err(PianoError::InvalidDuration {
                song: name.to_owned(),
                index,
            });
        }

        let notes = notes
            .iter()
            .map(|&note| {
                registry.find(note).ok_or_else(|| PianoError::UnknownNote {
                    song: name.to_owned(),
                    note: note.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_owned(),
            notes,
            durations: durations.to_vec(),
            tempo,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &[NoteId] {
        &self.notes
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Length of one beat in milliseconds: `60000 / tempo`.
    pub fn beat_ms(&self) -> f64 {
        60_000.0 / self.tempo
    }

    /// Wall-clock length of note `index` at `speed`, never shorter than
    /// [`MIN_STEP`]. `None` past the end or when it does not fit a `Duration`.
    pub fn note_duration(&self, index: usize, speed: f64) -> Option<Duration> {
        self.durations
            .get(index)
            .and_then(|beats| step_from_ms(beats * self.beat_ms() / speed))
    }

    /// Half a beat at `speed`: the gap before a looping song starts over.
    pub fn loop_rest(&self, speed: f64) -> Option<Duration> {
        step_from_ms(self.beat_ms() / speed / 2.0)
    }
}

type SongTable = (&'static str, &'static [&'static str], &'static [f64], f64);

const STANDARD_SONGS: &[SongTable] = &[
    (
        "Twinkle Twinkle",
        &["C4", "C4", "G4", "G4", "A4", "A4", "G4", "F4", "F4", "E4", "E4", "D4", "D4", "C4"],
        &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0],
        120.0,
    ),
    (
        "Mary Had a Little Lamb",
        &["E4", "D4", "C4", "D4", "E4", "E4", "E4", "D4", "D4", "D4", "E4", "G4", "G4"],
        &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0],
        100.0,
    ),
    (
        "Jingle Bells",
        &["E4", "E4", "E4", "E4", "E4", "E4", "E4", "G4", "C4", "D4", "E4"],
        &[1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 4.0],
        140.0,
    ),
    (
        "Ode to Joy",
        &[
            "E4", "E4", "F4", "G4", "G4", "F4", "E4", "D4", "C4", "C4", "D4", "E4", "E4", "D4",
            "D4",
        ],
        &[
            1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.5, 0.5, 2.0,
        ],
        110.0,
    ),
];

/// Ordered, immutable set of songs. Order defines "next song".
#[derive(Debug, Clone)]
pub struct SongCatalog {
    songs: Vec<Arc<Song>>,
}

impl SongCatalog {
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs: songs.into_iter().map(Arc::new).collect(),
        }
    }

    /// The four preset melodies, validated against `registry`.
    pub fn standard(registry: &NoteRegistry) -> Result<Self, PianoError> {
        let songs = STANDARD_SONGS
            .iter()
            .map(|&(name, notes, durations, tempo)| {
                Song::new(name, notes, durations, tempo, registry)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(songs))
    }

    pub fn get(&self, id: SongId) -> Option<&Arc<Song>> {
        self.songs.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<SongId> {
        self.songs.iter().position(|s| s.name() == name).map(SongId)
    }

    /// The song after `current` in catalog order, wrapping. With no current
    /// song this is the first one.
    pub fn next(&self, current: Option<SongId>) -> Option<SongId> {
        if self.songs.is_empty() {
            return None;
        }
        Some(match current {
            Some(SongId(i)) => SongId((i + 1) % self.songs.len()),
            None => SongId(0),
        })
    }

    pub fn first(&self) -> Option<SongId> {
        self.next(None)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SongId, &Arc<Song>)> {
        self.songs.iter().enumerate().map(|(i, s)| (SongId(i), s))
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
