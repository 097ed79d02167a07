//! Transport bar widget - mode, song, speed, toggles and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use saavy_piano::{
    practice::PlaybackState,
    synth::{ToneSource, VoiceMeter},
    Mode, Piano,
};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn flag(name: &str, on: bool) -> Span<'static> {
    Span::styled(
        format!("{name}: {}  ", if on { "on" } else { "off" }),
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

/// Render the transport bar
pub fn render_transport<T: ToneSource>(
    frame: &mut Frame,
    area: Rect,
    piano: &Piano<T>,
    sample_rate: Option<f32>,
    meter: Option<VoiceMeter>,
    audio_stats: &AudioStats,
) {
    let block = Block::default().title(" saavy piano ").borders(Borders::ALL);

    let (mode, mode_color) = match piano.mode() {
        Mode::Free => ("Free play", Color::Cyan),
        Mode::Practice => ("Practice", Color::Yellow),
        Mode::AutoPlay => ("Auto-play", Color::Green),
    };
    let play_symbol = match piano.autoplay().state() {
        PlaybackState::Running => "▶",
        PlaybackState::Idle => "■",
        _ => "⏸",
    };
    let song = piano
        .autoplay()
        .song()
        .map_or_else(|| "-".to_owned(), |s| s.name().to_owned());

    let audio = match sample_rate {
        Some(rate) => format!("{:.1}kHz  ", rate / 1000.0),
        None => "no audio  ".to_owned(),
    };
    let voices = meter.map_or_else(String::new, voice_summary);

    let line = Line::from(vec![
        Span::styled(
            format!(" {play_symbol} {mode}  "),
            Style::default().fg(mode_color),
        ),
        Span::styled(format!("{song}  "), Style::default().fg(Color::White)),
        Span::styled(
            format!("Speed: {:.1}x  ", piano.autoplay().speed()),
            Style::default().fg(Color::Cyan),
        ),
        flag("Loop", piano.autoplay().looping()),
        flag("Mute", piano.is_muted()),
        Span::styled(
            format!("Notes: {}  ", piano.active_notes().len()),
            Style::default().fg(Color::White),
        ),
        Span::styled(audio, Style::default().fg(Color::DarkGray)),
        Span::styled(voices, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

fn voice_summary(meter: VoiceMeter) -> String {
    let mut text = format!(
        "Voices: {}/{} ({:.2})  ",
        meter.active, meter.capacity, meter.loudest
    );
    if meter.dropped > 0 {
        text.push_str(&format!("Dropped: {}  ", meter.dropped));
    }
    text
}

/// Render song progress: auto-play position or practice cursor.
pub fn render_progress<T: ToneSource>(
    frame: &mut Frame,
    area: Rect,
    piano: &Piano<T>,
    banner: Option<&str>,
) {
    let (ratio, label) = match piano.mode() {
        Mode::AutoPlay => {
            let progress = piano.autoplay().progress();
            (progress as f64, format!("{:.0}%", progress * 100.0))
        }
        Mode::Practice => {
            let judge = piano.judge();
            let len = judge.song().map_or(0, |s| s.len());
            let next = judge
                .expected()
                .map(|id| piano.keyboard().notes.name(id).to_owned())
                .unwrap_or_default();
            let ratio = if len == 0 {
                0.0
            } else {
                judge.cursor() as f64 / len as f64
            };
            (ratio, format!("{}/{}  next: {next}", judge.cursor(), len))
        }
        Mode::Free => (0.0, String::new()),
    };

    let title = match banner {
        Some(text) => format!(" {text} "),
        None => " Progress ".to_owned(),
    };
    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}
