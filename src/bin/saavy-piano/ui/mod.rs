//! TUI module for saavy-piano
//!
//! Draws the piano state each frame. Nothing here mutates the piano; the
//! viewport is the only state owned by the UI.

mod keyboard;
mod transport;
pub mod viewport;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use saavy_piano::{
    synth::{ToneSource, VoiceMeter},
    Piano,
};

use keyboard::{visible_keys, KeyboardView};
use transport::{render_progress, render_transport, AudioStats};
use viewport::{octave_at, Viewport};
use waveform::render_waveform;

const HELP: &str = " [Esc] Quit  [Space] Auto-play  [Tab] Next song  [F1-F4] Song  \
[Enter] Restart  [Up/Down] Speed  [Left/Right] Octave  [F5] Mute  [F6] Loop  [Bksp] Free play";

pub struct Screen<'a, T: ToneSource> {
    pub piano: &'a Piano<T>,
    pub viewport: &'a mut Viewport,
    pub audio_buffer: &'a [f32],
    pub meter: Option<VoiceMeter>,
    pub sample_rate: Option<f32>,
    pub banner: Option<&'a str>,
}

impl<T: ToneSource> Screen<'_, T> {
    pub fn render(self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(3), // Progress
                Constraint::Min(12),   // Keyboard and stage
                Constraint::Length(8), // Waveform
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(self.audio_buffer);
        render_transport(frame, chunks[0], self.piano, self.sample_rate, self.meter, &stats);
        render_progress(frame, chunks[1], self.piano, self.banner);

        let keyboard = self.piano.keyboard();
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(chunks[2]);
        self.viewport.set_visible(visible_keys(inner.width));

        let octave = octave_at(keyboard, self.viewport.centre())
            .map_or_else(String::new, |o| format!(" Octave {o} "));
        frame.render_widget(block.title(" Keyboard ").title(octave), chunks[2]);
        frame.render_widget(
            KeyboardView {
                keyboard,
                active: self.piano.active_notes(),
                expected: self.piano.judge().expected(),
                animations: self.piano.animations(),
                viewport: self.viewport,
            },
            inner,
        );

        render_waveform(frame, chunks[3], self.audio_buffer, self.piano.is_muted());

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
