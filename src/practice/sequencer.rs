//! AutoPlayer - timed playback of a song from the catalog
//!
//! The auto-player walks a song one note at a time. Each step emits the note,
//! then schedules the next step after that note's length. It owns the only
//! copy of the playback cursor; the renderer reads progress through accessors.
//!
//! ```text
//!              load_song                 start
//!   ┌──────┐ ───────────→ ┌─────────┐ ─────────→ ┌─────────┐
//!   │ Idle │              │ Stopped │            │ Running │ ──┐ advance
//!   └──────┘ ←─────────── └─────────┘ ←───────── └─────────┘ ←─┘
//!              unload          ↑        pause          │
//!                              │                       │ cursor == len
//!                              │    no loop      ┌───────────┐
//!                              └──────────────── │ Completed │ ── loop ──→ Running
//!                                                └───────────┘
//! ```
//!
//! Timing rules:
//! - note length = beats * (60000 / tempo) / speed, in milliseconds
//! - speed is read when a step runs; a pending step keeps the delay it was
//!   scheduled with, so speed changes only apply from the next note on
//! - after the last note has had its full length the song completes; when
//!   looping, playback restarts after half a beat of rest
//! - no step is scheduled closer than `MIN_STEP` (1 ms) to the previous one

use std::{sync::Arc, time::Duration};

use crate::{
    engine::{Scheduler, Timer, TimerId},
    error::PianoError,
    keyboard::{NoteId, Song, SongCatalog, SongId},
};

/// Slowest accepted speed multiplier.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest accepted speed multiplier.
pub const MAX_SPEED: f64 = 100.0;

/// Accept `multiplier` if it lies in `MIN_SPEED..=MAX_SPEED`.
pub fn check_speed(multiplier: f64) -> Result<f64, PianoError> {
    if (MIN_SPEED..=MAX_SPEED).contains(&multiplier) {
        Ok(multiplier)
    } else {
        Err(PianoError::InvalidSpeed(multiplier))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No song loaded
    Idle,
    /// Song loaded, not advancing
    Stopped,
    /// Advancing on the scheduler
    Running,
    /// Cursor reached the end. Only held for the duration of the completing step.
    Completed,
}

/// What a step produced, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequencerEvent {
    /// Play this note now.
    Play { note: NoteId, index: usize },
    /// Progress through the song changed (0.0 - 1.0).
    Progress(f32),
    /// The song ran to its end.
    Completed { song: SongId, looping: bool },
}

pub struct AutoPlayer {
    song: Option<(SongId, Arc<Song>)>,
    /// Index of the next note to play (0..=len)
    cursor: usize,
    speed: f64,
    state: PlaybackState,
    progress: f32,
    looping: bool,
    /// The one outstanding Advance timer, if any
    pending: Option<TimerId>,
}

impl AutoPlayer {
    pub fn new(speed: f64, looping: bool) -> Self {
        Self {
            song: None,
            cursor: 0,
            speed,
            state: PlaybackState::Idle,
            progress: 0.0,
            looping,
            pending: None,
        }
    }

    /// Load a song, from any state. Stops playback and rewinds.
    ///
    /// An unknown id is rejected and nothing changes.
    pub fn load_song(
        &mut self,
        catalog: &SongCatalog,
        id: SongId,
        timers: &mut Scheduler<Timer>,
    ) -> Result<(), PianoError> {
        let song = catalog
            .get(id)
            .cloned()
            .ok_or_else(|| PianoError::UnknownSong(format!("#{}", id.0)))?;

        self.cancel_pending(timers);
        log::info!("auto-play: loaded '{}' ({} notes)", song.name(), song.len());
        self.song = Some((id, song));
        self.cursor = 0;
        self.progress = 0.0;
        self.state = PlaybackState::Stopped;
        Ok(())
    }

    /// Drop the loaded song and go back to Idle.
    pub fn unload(&mut self, timers: &mut Scheduler<Timer>) {
        self.cancel_pending(timers);
        self.song = None;
        self.cursor = 0;
        self.progress = 0.0;
        self.state = PlaybackState::Idle;
    }

    /// Begin or resume playback from the cursor. The note under the cursor
    /// plays immediately.
    ///
    /// No-op when already running or when no song is loaded.
    pub fn start(&mut self, timers: &mut Scheduler<Timer>, out: &mut Vec<SequencerEvent>) {
        if self.state == PlaybackState::Running || self.song.is_none() {
            return;
        }

        if self.cursor >= self.song_len() {
            self.cursor = 0;
            self.progress = 0.0;
        }

        log::info!("auto-play: start at note {} (speed {:.1}x)", self.cursor, self.speed);
        self.state = PlaybackState::Running;
        self.advance(timers, out);
    }

    /// Stop advancing, keeping the cursor so `start` resumes on the same note.
    ///
    /// No-op unless running.
    pub fn pause(&mut self, timers: &mut Scheduler<Timer>) {
        if self.state != PlaybackState::Running {
            return;
        }
        self.cancel_pending(timers);
        self.state = PlaybackState::Stopped;
        log::info!("auto-play: paused at note {}", self.cursor);
    }

    /// Change the speed multiplier.
    ///
    /// Takes effect from the next scheduling decision. The step already
    /// pending keeps its delay. Speeds outside `MIN_SPEED..=MAX_SPEED` are
    /// rejected and the old speed stays.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PianoError> {
        self.speed = check_speed(multiplier)?;
        Ok(())
    }

    /// Load the next song in catalog order (wrapping, or the first song when
    /// idle). Keeps playing if it was playing.
    pub fn skip_to_next_song(
        &mut self,
        catalog: &SongCatalog,
        timers: &mut Scheduler<Timer>,
        out: &mut Vec<SequencerEvent>,
    ) -> Option<SongId> {
        let was_running = self.state == PlaybackState::Running;
        self.cancel_pending(timers);

        let next = catalog.next(self.song_id())?;
        self.load_song(catalog, next, timers).ok()?;
        if was_running {
            self.start(timers, out);
        }
        Some(next)
    }

    /// Rewind to the first note. When running, the first note plays now.
    pub fn restart(&mut self, timers: &mut Scheduler<Timer>, out: &mut Vec<SequencerEvent>) {
        self.cursor = 0;
        self.progress = 0.0;
        out.push(SequencerEvent::Progress(0.0));

        if self.state == PlaybackState::Running {
            self.cancel_pending(timers);
            self.advance(timers, out);
        }
    }

    /// Dispatch a fired Advance timer. Timers this player no longer owns are
    /// ignored.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        timers: &mut Scheduler<Timer>,
        out: &mut Vec<SequencerEvent>,
    ) {
        if self.pending != Some(id) {
            return;
        }
        self.pending = None;

        if self.state == PlaybackState::Running {
            self.advance(timers, out);
        }
    }

    fn advance(&mut self, timers: &mut Scheduler<Timer>, out: &mut Vec<SequencerEvent>) {
        let Some((song_id, song)) = self.song.clone() else {
            return;
        };

        if self.cursor >= song.len() {
            self.state = PlaybackState::Completed;
            log::info!("auto-play: '{}' complete", song.name());
            out.push(SequencerEvent::Completed {
                song: song_id,
                looping: self.looping,
            });

            self.cursor = 0;
            self.progress = 0.0;
            out.push(SequencerEvent::Progress(0.0));

            // An empty song would loop forever without ever playing a note
            match song.loop_rest(self.speed) {
                Some(rest) if self.looping && !song.is_empty() => {
                    self.state = PlaybackState::Running;
                    self.schedule(timers, rest);
                }
                _ => self.state = PlaybackState::Stopped,
            }
            return;
        }

        let index = self.cursor;
        let note = song.notes()[index];
        let Some(wait) = song.note_duration(index, self.speed) else {
            log::warn!("auto-play: note {index} of '{}' cannot be scheduled", song.name());
            self.state = PlaybackState::Stopped;
            return;
        };

        out.push(SequencerEvent::Play { note, index });

        self.progress = (index + 1) as f32 / song.len() as f32;
        out.push(SequencerEvent::Progress(self.progress));
        self.cursor = index + 1;

        log::debug!("auto-play: note {index} of '{}', next in {wait:?}", song.name());
        self.schedule(timers, wait);
    }

    fn schedule(&mut self, timers: &mut Scheduler<Timer>, delay: Duration) {
        self.cancel_pending(timers);
        self.pending = Some(timers.schedule_in(delay, Timer::Advance));
    }

    fn cancel_pending(&mut self, timers: &mut Scheduler<Timer>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    fn song_len(&self) -> usize {
        self.song.as_ref().map_or(0, |(_, s)| s.len())
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn song(&self) -> Option<&Arc<Song>> {
        self.song.as_ref().map(|(_, s)| s)
    }

    pub fn song_id(&self) -> Option<SongId> {
        self.song.as_ref().map(|(id, _)| *id)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Whether an Advance timer is outstanding.
    pub fn has_pending_step(&self) -> bool {
        self.pending.is_some()
    }
}
