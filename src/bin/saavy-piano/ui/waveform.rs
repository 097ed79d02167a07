//! Oscilloscope of the synth output

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// A single tone peaks at 0.5; past this the mix is getting hot.
const HOT: f32 = 0.9;

fn trace_color(audio_buffer: &[f32], muted: bool) -> Color {
    if muted {
        Color::DarkGray
    } else if audio_buffer.iter().any(|s| s.abs() >= HOT) {
        Color::Red
    } else {
        Color::Cyan
    }
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32], muted: bool) {
    let title = if muted { " Waveform (muted) " } else { " Waveform " };

    let span = audio_buffer.len().max(1) as f64;
    let points: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64 / span, s as f64))
        .collect();

    let trace = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(trace_color(audio_buffer, muted)))
        .data(&points);

    let axis_style = Style::default().fg(Color::DarkGray);
    let chart = Chart::new(vec![trace])
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(Axis::default().bounds([0.0, 1.0]).style(axis_style))
        .y_axis(Axis::default().bounds([-1.0, 1.0]).style(axis_style));

    frame.render_widget(chart, area);
}
