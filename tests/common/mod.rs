#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use saavy_piano::{
    keyboard::{NoteRegistry, Song, SongCatalog},
    synth::{ToneHandle, ToneSource},
    Keyboard, Piano, PianoConfig, PianoEvent,
};

/// Remembers every tone it was asked for.
#[derive(Debug, Default)]
pub struct RecordingToneSource {
    pub played: Vec<f32>,
    pub stopped: Vec<ToneHandle>,
    pub stop_all_calls: usize,
    next: u64,
}

impl ToneSource for RecordingToneSource {
    fn play(&mut self, frequency: f32) -> Option<ToneHandle> {
        self.played.push(frequency);
        let tone = ToneHandle(self.next);
        self.next += 1;
        Some(tone)
    }

    fn stop(&mut self, tone: ToneHandle) {
        self.stopped.push(tone);
    }

    fn stop_all(&mut self) {
        self.stop_all_calls += 1;
    }
}

pub type SongDef = (&'static str, &'static [&'static str], &'static [f64], f64);

/// Notes C4 C4 G4, lengths 1 1 2 at 120 bpm: plays at 0, 500 and 1000 ms.
pub const SHORT: SongDef = ("Short", &["C4", "C4", "G4"], &[1.0, 1.0, 2.0], 120.0);
pub const ARPEGGIO: SongDef = ("Arpeggio", &["C4", "E4", "G4"], &[1.0, 1.0, 1.0], 60.0);
pub const EMPTY: SongDef = ("Empty", &[], &[], 120.0);

pub fn keyboard(songs: &[SongDef]) -> Arc<Keyboard> {
    let notes = NoteRegistry::standard();
    let songs = songs
        .iter()
        .map(|&(name, n, d, tempo)| Song::new(name, n, d, tempo, &notes).unwrap())
        .collect();
    Arc::new(Keyboard::new(notes, SongCatalog::new(songs)))
}

pub fn piano(songs: &[SongDef], config: PianoConfig) -> Piano<RecordingToneSource> {
    Piano::new(keyboard(songs), RecordingToneSource::default(), config).unwrap()
}

pub fn no_loop() -> PianoConfig {
    PianoConfig {
        looping: false,
        ..PianoConfig::default()
    }
}

pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Auto-played notes as (time in ms, note name).
pub fn autoplayed(piano: &Piano<RecordingToneSource>, events: &[PianoEvent]) -> Vec<(u64, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            PianoEvent::NotePlayed {
                note,
                at,
                source: saavy_piano::NoteSource::AutoPlay,
            } => Some((
                at.as_millis() as u64,
                piano.keyboard().notes.name(*note).to_owned(),
            )),
            _ => None,
        })
        .collect()
}

pub fn plays(expected: &[(u64, &str)]) -> Vec<(u64, String)> {
    expected.iter().map(|&(t, n)| (t, n.to_owned())).collect()
}
