/*
Piano Session
=============

`Piano` is the one logical thread that owns every piece of gameplay state:

  ActiveNotes      which keys are sounding
  AutoPlayer       timed playback of a song
  PracticeJudge    progress through a song played by hand
  NoteAnimations   floating markers above the keys

Everything that happens is either a direct call (a key press, a button) or a
timer firing on the virtual clock. The owner drives the clock with
`advance_clock`; the binary feeds it wall time, tests feed it whatever they
like. Callbacks run one at a time in deadline order, so there is no locking
and no interleaving to reason about.

A played note goes through the same path whoever played it:

  play_note ──→ ToneSource::play  (skipped while muted)
            ──→ ActiveNotes::trigger
            ──→ NoteAnimations::spawn
            ──→ schedule ToneFinished after the sounding window
                     │
                     ▼
               ToneSource::stop
               ActiveNotes::release
               PracticeJudge  (practice mode only)

The renderer never reaches into the state machines to change them. It reads
through accessors and drains `PianoEvent`s after each batch of input.
*/

use std::{sync::Arc, time::Duration};

use crate::{
    config::PianoConfig,
    engine::{Scheduler, Timer, TimerId},
    error::PianoError,
    keyboard::{Keyboard, NoteId, SongId},
    practice::{
        ActiveNotes, AutoPlayer, Judgement, NoteAnimations, PracticeJudge, SequencerEvent,
    },
    synth::{ToneHandle, ToneSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No song; keys just make sound.
    Free,
    /// A song is selected and judged as the player plays it.
    Practice,
    /// The auto-player is performing the selected song.
    AutoPlay,
}

/// Who asked for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    Key,
    Pointer,
    AutoPlay,
}

/// Things the renderer may want to react to, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PianoEvent {
    NotePlayed {
        note: NoteId,
        at: Duration,
        source: NoteSource,
    },
    NoteFinished {
        note: NoteId,
        at: Duration,
    },
    /// The auto-player is playing a note; scroll it on screen if needed.
    ScrollIntoView(NoteId),
    PracticeAdvanced {
        cursor: usize,
        len: usize,
    },
    PracticeCompleted {
        song: SongId,
    },
    AutoPlayProgress(f32),
    AutoPlayCompleted {
        song: SongId,
    },
    SongLoaded {
        song: SongId,
    },
}

pub struct Piano<T: ToneSource> {
    keyboard: Arc<Keyboard>,
    config: PianoConfig,
    tones: T,
    muted: bool,
    timers: Scheduler<Timer>,
    active: ActiveNotes,
    autoplay: AutoPlayer,
    judge: PracticeJudge,
    animations: NoteAnimations,
    animation_timer: Option<TimerId>,
    mode: Mode,
    current_song: Option<SongId>,
    events: Vec<PianoEvent>,
}

impl<T: ToneSource> Piano<T> {
    pub fn new(keyboard: Arc<Keyboard>, tones: T, config: PianoConfig) -> Result<Self, PianoError> {
        config.validate()?;

        Ok(Self {
            keyboard,
            autoplay: AutoPlayer::new(config.initial_speed, config.looping),
            config,
            tones,
            muted: false,
            timers: Scheduler::new(),
            active: ActiveNotes::new(),
            judge: PracticeJudge::new(),
            animations: NoteAnimations::new(),
            animation_timer: None,
            mode: Mode::Free,
            current_song: None,
            events: Vec::new(),
        })
    }

    // ---- input ----

    /// A computer key went down. Unbound keys and keys whose note is still
    /// sounding do nothing.
    pub fn press_key(&mut self, key: char) -> Option<NoteId> {
        let note = match self.keyboard.notes.resolve_trigger(key) {
            Ok(note) => note,
            Err(err) => {
                log::trace!("{err}");
                return None;
            }
        };

        if self.active.is_active(note) {
            return None;
        }

        self.play_note(note, NoteSource::Key).then_some(note)
    }

    /// A computer key came up. The tone keeps ringing until its window ends.
    pub fn release_key(&mut self, key: char) {
        if let Ok(note) = self.keyboard.notes.resolve_trigger(key) {
            self.active.release(note);
        }
    }

    /// A key was clicked or touched. Always sounds, even if already active.
    pub fn press_note(&mut self, note: NoteId) -> bool {
        self.play_note(note, NoteSource::Pointer)
    }

    pub fn release_note(&mut self, note: NoteId) {
        self.active.release(note);
    }

    // ---- songs and modes ----

    /// Select a song by name. See [`Piano::select_song_id`].
    pub fn select_song(&mut self, name: &str) -> Result<SongId, PianoError> {
        let Some(id) = self.keyboard.songs.find(name) else {
            log::warn!("no song named '{name}'");
            return Err(PianoError::UnknownSong(name.to_owned()));
        };
        self.select_song_id(id)?;
        Ok(id)
    }

    /// Load a song for practice, or keep performing on the new song if the
    /// auto-player was running.
    pub fn select_song_id(&mut self, id: SongId) -> Result<(), PianoError> {
        let was_running = self.autoplay.is_running();

        if let Err(err) = self
            .autoplay
            .load_song(&self.keyboard.songs, id, &mut self.timers)
        {
            log::warn!("{err}");
            return Err(err);
        }
        self.song_loaded(id);

        if was_running {
            let mut out = Vec::new();
            self.autoplay.start(&mut self.timers, &mut out);
            self.set_mode(Mode::AutoPlay);
            self.apply_sequencer(out);
        } else {
            self.set_mode(Mode::Practice);
        }
        Ok(())
    }

    /// Start or pause the auto-player. With no song selected the first song
    /// in the catalog is picked.
    pub fn toggle_autoplay(&mut self) {
        if self.current_song.is_none() {
            let Some(first) = self.keyboard.songs.first() else {
                return;
            };
            if self.select_song_id(first).is_err() {
                return;
            }
        }

        if self.autoplay.is_running() {
            self.autoplay.pause(&mut self.timers);
            self.set_mode(Mode::Practice);
        } else {
            let mut out = Vec::new();
            self.set_mode(Mode::AutoPlay);
            self.autoplay.start(&mut self.timers, &mut out);
            self.apply_sequencer(out);
        }
    }

    /// Drop the current song and go back to playing freely.
    pub fn free_play(&mut self) {
        self.autoplay.unload(&mut self.timers);
        self.judge.clear();
        self.current_song = None;
        self.set_mode(Mode::Free);
    }

    pub fn skip_to_next_song(&mut self) -> Option<SongId> {
        let mut out = Vec::new();
        let next = self
            .autoplay
            .skip_to_next_song(&self.keyboard.songs, &mut self.timers, &mut out)?;

        self.song_loaded(next);
        if self.autoplay.is_running() {
            self.set_mode(Mode::AutoPlay);
        } else {
            self.set_mode(Mode::Practice);
        }
        self.apply_sequencer(out);
        Some(next)
    }

    /// Rewind the current song, for the auto-player and the judge alike.
    pub fn restart(&mut self) {
        let mut out = Vec::new();
        self.autoplay.restart(&mut self.timers, &mut out);
        self.judge.reset();
        if let Some(song) = self.judge.song() {
            self.events.push(PianoEvent::PracticeAdvanced {
                cursor: 0,
                len: song.len(),
            });
        }
        self.apply_sequencer(out);
    }

    // ---- settings ----

    /// Set the auto-play speed multiplier. Applies from the next note on.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PianoError> {
        self.autoplay.set_speed(multiplier).inspect_err(|err| {
            log::warn!("{err}");
        })
    }

    /// Move the speed by `steps` increments, clamped to the configured range.
    pub fn nudge_speed(&mut self, steps: i32) -> f64 {
        let raw = self.autoplay.speed() + steps as f64 * self.config.speed_step;
        let speed = ((raw * 100.0).round() / 100.0)
            .clamp(self.config.min_speed, self.config.max_speed);

        if let Err(err) = self.autoplay.set_speed(speed) {
            log::warn!("{err}");
            return self.autoplay.speed();
        }
        log::info!("speed {speed:.1}x");
        speed
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.autoplay.set_looping(looping);
        log::info!("looping {}", if looping { "on" } else { "off" });
    }

    pub fn toggle_looping(&mut self) -> bool {
        let looping = !self.autoplay.looping();
        self.set_looping(looping);
        looping
    }

    /// While muted nothing reaches the tone source. Everything else carries on.
    pub fn set_muted(&mut self, muted: bool) {
        if muted && !self.muted {
            self.tones.stop_all();
        }
        self.muted = muted;
        log::info!("{}", if muted { "muted" } else { "unmuted" });
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    // ---- clock ----

    /// Run every timer due at or before `until`, in deadline order, then move
    /// the clock to `until`.
    pub fn advance_clock(&mut self, until: Duration) {
        while let Some((id, timer)) = self.timers.pop_due(until) {
            match timer {
                Timer::Advance => {
                    let mut out = Vec::new();
                    self.autoplay.on_timer(id, &mut self.timers, &mut out);
                    self.apply_sequencer(out);
                }
                Timer::ToneFinished { note, tone } => self.finish_note(note, tone),
                Timer::AnimationTick => self.animation_tick(id),
            }
        }
        self.timers.advance_to(until);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_clock(self.timers.now() + delta);
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PianoEvent> {
        self.events.drain(..)
    }

    // ---- read-only views ----

    pub fn keyboard(&self) -> &Arc<Keyboard> {
        &self.keyboard
    }

    pub fn config(&self) -> &PianoConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_song(&self) -> Option<SongId> {
        self.current_song
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn active_notes(&self) -> &ActiveNotes {
        &self.active
    }

    pub fn autoplay(&self) -> &AutoPlayer {
        &self.autoplay
    }

    pub fn judge(&self) -> &PracticeJudge {
        &self.judge
    }

    pub fn animations(&self) -> &NoteAnimations {
        &self.animations
    }

    pub fn tones(&self) -> &T {
        &self.tones
    }

    pub fn tones_mut(&mut self) -> &mut T {
        &mut self.tones
    }

    // ---- internals ----

    fn play_note(&mut self, id: NoteId, source: NoteSource) -> bool {
        let keyboard = Arc::clone(&self.keyboard);
        let Some(note) = keyboard.notes.get(id) else {
            log::warn!("note #{} is not on this keyboard", id.0);
            return false;
        };

        let tone = if self.muted {
            None
        } else {
            self.tones.play(note.freq)
        };

        self.active.trigger(id);
        self.animations.spawn(id, note, keyboard.key_anchor(id));
        self.ensure_animation_timer();

        self.timers.schedule_in(
            self.config.tone.sounding,
            Timer::ToneFinished { note: id, tone },
        );

        log::debug!("play {} ({:.2} Hz) from {source:?}", note.name, note.freq);
        self.events.push(PianoEvent::NotePlayed {
            note: id,
            at: self.timers.now(),
            source,
        });
        true
    }

    fn finish_note(&mut self, note: NoteId, tone: Option<ToneHandle>) {
        if let Some(tone) = tone {
            self.tones.stop(tone);
        }
        self.active.release(note);
        self.events.push(PianoEvent::NoteFinished {
            note,
            at: self.timers.now(),
        });

        if self.mode != Mode::Practice {
            return;
        }

        match self.judge.on_note_played(note) {
            Judgement::Advanced { cursor } => {
                let len = self.judge.song().map_or(0, |s| s.len());
                self.events.push(PianoEvent::PracticeAdvanced { cursor, len });
            }
            Judgement::Completed => self.practice_completed(),
            Judgement::Miss | Judgement::Ignored => {}
        }
    }

    fn practice_completed(&mut self) {
        let len = self.judge.song().map_or(0, |s| s.len());
        self.events.push(PianoEvent::PracticeAdvanced { cursor: len, len });

        if let Some(song) = self.current_song {
            if let Some(name) = self.keyboard.songs.get(song).map(|s| s.name().to_owned()) {
                log::info!("practice: '{name}' complete");
            }
            self.events.push(PianoEvent::PracticeCompleted { song });
        }
        self.free_play();
    }

    fn apply_sequencer(&mut self, out: Vec<SequencerEvent>) {
        for event in out {
            match event {
                SequencerEvent::Play { note, .. } => {
                    self.events.push(PianoEvent::ScrollIntoView(note));
                    self.play_note(note, NoteSource::AutoPlay);
                }
                SequencerEvent::Progress(progress) => {
                    self.events.push(PianoEvent::AutoPlayProgress(progress));
                }
                SequencerEvent::Completed { song, .. } => {
                    self.events.push(PianoEvent::AutoPlayCompleted { song });
                    if !self.autoplay.is_running() {
                        self.set_mode(Mode::Practice);
                    }
                }
            }
        }
    }

    fn song_loaded(&mut self, id: SongId) {
        if let Some(song) = self.keyboard.songs.get(id) {
            self.judge.begin(Arc::clone(song));
        }
        self.current_song = Some(id);
        self.events.push(PianoEvent::SongLoaded { song: id });
        self.events.push(PianoEvent::AutoPlayProgress(0.0));
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::info!("mode {:?} -> {mode:?}", self.mode);
            self.mode = mode;
        }
    }

    fn ensure_animation_timer(&mut self) {
        if self.animation_timer.is_none() && !self.animations.is_empty() {
            self.animation_timer = Some(
                self.timers
                    .schedule_in(self.config.animation_tick, Timer::AnimationTick),
            );
        }
    }

    fn animation_tick(&mut self, id: TimerId) {
        if self.animation_timer != Some(id) {
            return;
        }
        self.animation_timer = None;
        self.animations.tick();
        self.ensure_animation_timer();
    }
}

impl<T: ToneSource> Drop for Piano<T> {
    fn drop(&mut self) {
        self.tones.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::SilentToneSource;

    fn piano() -> Piano<SilentToneSource> {
        let keyboard = Arc::new(Keyboard::standard().unwrap());
        Piano::new(keyboard, SilentToneSource, PianoConfig::default()).unwrap()
    }

    #[test]
    fn held_key_is_not_retriggered() {
        let mut piano = piano();
        assert!(piano.press_key('b').is_some());
        assert!(piano.press_key('b').is_none());

        piano.release_key('b');
        assert!(piano.press_key('b').is_some());
    }

    #[test]
    fn pointer_path_always_triggers() {
        let mut piano = piano();
        let c4 = piano.keyboard().notes.find("C4").unwrap();
        assert!(piano.press_note(c4));
        assert!(piano.press_note(c4));
        assert_eq!(piano.animations().len(), 2);
    }

    #[test]
    fn unbound_key_is_a_no_op() {
        let mut piano = piano();
        assert_eq!(piano.press_key('1'), None);
        assert_eq!(piano.drain_events().count(), 0);
    }

    #[test]
    fn note_finishes_after_the_sounding_window() {
        let mut piano = piano();
        let c4 = piano.press_key('b').unwrap();
        piano.advance_clock(Duration::from_millis(999));
        assert!(piano.active_notes().is_active(c4));

        piano.advance_clock(Duration::from_millis(1000));
        assert!(!piano.active_notes().is_active(c4));
        assert!(piano
            .drain_events()
            .any(|e| e == PianoEvent::NoteFinished { note: c4, at: Duration::from_secs(1) }));
    }

    #[test]
    fn animations_run_until_faded() {
        let mut piano = piano();
        piano.press_key('b');
        piano.advance_clock(Duration::from_millis(16 * 50));
        assert_eq!(piano.animations().len(), 1);

        piano.advance_clock(Duration::from_secs(5));
        assert!(piano.animations().is_empty());
        assert_eq!(piano.next_deadline(), None);
    }

    #[test]
    fn unknown_song_changes_nothing() {
        let mut piano = piano();
        let err = piano.select_song("Für Elise").unwrap_err();
        assert_eq!(err, PianoError::UnknownSong("Für Elise".into()));
        assert_eq!(piano.mode(), Mode::Free);
        assert_eq!(piano.current_song(), None);
    }

    #[test]
    fn selecting_a_song_enters_practice() {
        let mut piano = piano();
        let id = piano.select_song("Ode to Joy").unwrap();
        assert_eq!(piano.mode(), Mode::Practice);
        assert_eq!(piano.current_song(), Some(id));
        assert_eq!(piano.judge().cursor(), 0);
    }

    #[test]
    fn toggle_autoplay_picks_the_first_song() {
        let mut piano = piano();
        piano.toggle_autoplay();
        assert_eq!(piano.mode(), Mode::AutoPlay);
        assert_eq!(piano.current_song(), Some(SongId(0)));
        assert!(piano.autoplay().is_running());

        piano.toggle_autoplay();
        assert_eq!(piano.mode(), Mode::Practice);
        assert!(!piano.autoplay().is_running());
    }

    #[test]
    fn nudge_speed_clamps_to_range() {
        let mut piano = piano();
        assert_eq!(piano.nudge_speed(3), 1.3);
        assert_eq!(piano.nudge_speed(50), 2.0);
        assert_eq!(piano.nudge_speed(-50), 0.5);
    }

    #[test]
    fn set_speed_rejects_nonsense() {
        let mut piano = piano();
        assert!(piano.set_speed(-2.0).is_err());
        assert_eq!(piano.autoplay().speed(), 1.0);
        piano.set_speed(3.0).unwrap();
        assert_eq!(piano.autoplay().speed(), 3.0);
    }

    #[test]
    fn free_play_drops_the_song() {
        let mut piano = piano();
        piano.toggle_autoplay();
        piano.free_play();

        assert_eq!(piano.mode(), Mode::Free);
        assert_eq!(piano.current_song(), None);
        assert!(!piano.autoplay().has_pending_step());
    }
}
