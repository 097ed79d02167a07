//! Event loop: terminal input in, piano clock forward, frame out

use std::{
    io::stdout,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::DefaultTerminal;
use saavy_piano::{
    synth::{ToneSource, VoiceMeter},
    Piano, PianoEvent, SongId,
};

use crate::{
    audio::{AudioFeeds, SCOPE_LEN},
    ui::{
        viewport::{white_index, Viewport},
        Screen,
    },
};

const FRAME: Duration = Duration::from_millis(16);
const BANNER_TIME: Duration = Duration::from_secs(3);

pub struct App<T: ToneSource> {
    piano: Piano<T>,
    viewport: Viewport,
    /// Feeds from the audio thread, absent when running silent
    feeds: Option<AudioFeeds>,
    audio_buffer: Vec<f32>,
    meter: Option<VoiceMeter>,
    sample_rate: Option<f32>,
    banner: Option<(String, Instant)>,
    started: Instant,
    should_quit: bool,
}

impl<T: ToneSource> App<T> {
    pub fn new(piano: Piano<T>, feeds: Option<AudioFeeds>, sample_rate: Option<f32>) -> Self {
        let viewport = Viewport::new(piano.keyboard().notes.white_key_count());
        Self {
            piano,
            viewport,
            feeds,
            audio_buffer: vec![0.0; SCOPE_LEN],
            meter: None,
            sample_rate,
            banner: None,
            started: Instant::now(),
            should_quit: false,
        }
    }

    /// Run until the user quits.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        // Without release events a held key only frees up when its tone ends
        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!("key release events {}", if enhanced { "on" } else { "off" });

        self.started = Instant::now();
        let result = self.event_loop(terminal);

        if enhanced {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.tick();

            terminal.draw(|frame| {
                Screen {
                    piano: &self.piano,
                    viewport: &mut self.viewport,
                    audio_buffer: &self.audio_buffer,
                    meter: self.meter,
                    sample_rate: self.sample_rate,
                    banner: self.banner.as_ref().map(|(text, _)| text.as_str()),
                }
                .render(frame)
            })?;

            if event::poll(FRAME)? {
                // Drain everything queued so fast chords land in one frame
                loop {
                    if let Event::Key(key) = event::read()? {
                        self.tick();
                        self.handle_key(key);
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }

        log::info!("quit");
        Ok(())
    }

    /// Bring the piano clock up to wall time and react to what happened.
    fn tick(&mut self) {
        self.piano.advance_clock(self.started.elapsed());

        let events: Vec<PianoEvent> = self.piano.drain_events().collect();
        for event in events {
            match event {
                PianoEvent::ScrollIntoView(note) => {
                    self.viewport
                        .scroll_into_view(white_index(self.piano.keyboard(), note));
                }
                PianoEvent::PracticeCompleted { song } => {
                    let name = self
                        .piano
                        .keyboard()
                        .songs
                        .get(song)
                        .map_or("song", |s| s.name());
                    self.banner = Some((format!("Well played! {name} complete"), Instant::now()));
                }
                _ => {}
            }
        }

        if self
            .banner
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() > BANNER_TIME)
        {
            self.banner = None;
        }
    }

    /// Keep the last `SCOPE_LEN` samples and the newest meter reading.
    fn poll_audio(&mut self) {
        let Some(feeds) = self.feeds.as_mut() else {
            return;
        };

        while let Ok(meter) = feeds.meter.pop() {
            self.meter = Some(meter);
        }
        while let Ok(sample) = feeds.scope.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > SCOPE_LEN {
            let excess = self.audio_buffer.len() - SCOPE_LEN;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            if let KeyCode::Char(c) = key.code {
                self.piano.release_key(c);
            }
            return;
        }
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.piano.toggle_autoplay(),
            KeyCode::Tab => {
                self.piano.skip_to_next_song();
            }
            KeyCode::F(n @ 1..=4) => {
                // Failure is logged by the piano and leaves it unchanged
                let _ = self.piano.select_song_id(SongId(n as usize - 1));
            }
            KeyCode::Enter => self.piano.restart(),
            KeyCode::Up => {
                self.piano.nudge_speed(1);
            }
            KeyCode::Down => {
                self.piano.nudge_speed(-1);
            }
            KeyCode::Left => self.viewport.scroll_octaves(-1),
            KeyCode::Right => self.viewport.scroll_octaves(1),
            KeyCode::F(5) => {
                self.piano.toggle_mute();
            }
            KeyCode::F(6) => {
                self.piano.toggle_looping();
            }
            KeyCode::Backspace => self.piano.free_play(),
            KeyCode::Char(c) => {
                self.piano.press_key(c);
            }
            _ => {}
        }
    }
}
