//! Keyboard widget - keys, held notes, the practice hint and floating notes
//!
//! ```text
//!         ♪            ♫                 <- stage (animations)
//!   │   ▐█▌ ▐█▌ │   ▐█▌ ▐█▌ ▐█▌ │
//!   │   ▐2▌ ▐3▌ │   ▐5▌ ▐6▌ ▐7▌ │         <- black keys with triggers
//!   │    │   │   │   │   │   │   │
//!   │C2  │D2  │E2  │F2  │G2  │A2  │B2   <- note names
//!   │ q  │ w  │ e  │ r  │ t  │ y  │ u   <- white key triggers
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use saavy_piano::{
    keyboard::{KeyColor, Keyboard, WHITE_KEY_WIDTH},
    practice::{ActiveNotes, NoteAnimations},
    NoteId,
};

use super::viewport::Viewport;

/// Terminal columns per white key.
pub const KEY_COLS: u16 = 5;
/// Rows taken by the keys themselves; everything above is stage.
const KEY_ROWS: u16 = 7;
const BLACK_ROWS: u16 = 4;
/// Stage rows per layout unit of animation rise.
const STAGE_ROWS_PER_UNIT: f32 = 2.0;

const WHITE_KEY: Color = Color::Rgb(235, 235, 225);
const BLACK_KEY: Color = Color::Rgb(30, 30, 30);
const HINT: Color = Color::Rgb(250, 200, 60);

pub struct KeyboardView<'a> {
    pub keyboard: &'a Keyboard,
    pub active: &'a ActiveNotes,
    /// Next note the practice judge wants.
    pub expected: Option<NoteId>,
    pub animations: &'a NoteAnimations,
    pub viewport: &'a Viewport,
}

/// How many white keys fit in `width` columns.
pub fn visible_keys(width: u16) -> usize {
    (width / KEY_COLS).max(1) as usize
}

impl Widget for KeyboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < KEY_ROWS || area.width < KEY_COLS {
            return;
        }

        let keys_top = area.bottom() - KEY_ROWS;
        let first = self.viewport.first();
        let last = first + self.viewport.visible();

        // Column of a white-key boundary, if it is on screen
        let column = |white: usize| -> Option<u16> {
            (first..=last)
                .contains(&white)
                .then(|| area.x + (white - first) as u16 * KEY_COLS)
        };

        for (id, note) in self.keyboard.notes.iter() {
            if note.color != KeyColor::White {
                continue;
            }
            let white = self.keyboard.notes.white_keys_before(id);
            let Some(x) = column(white).filter(|_| white < last) else {
                continue;
            };

            let fill = self.key_fill(id, note.octave, WHITE_KEY);
            let body = Rect::new(x, keys_top, KEY_COLS, KEY_ROWS).intersection(area);
            buf.set_style(body, Style::default().bg(fill));
            for row in keys_top..area.bottom() {
                buf.set_string(x, row, "│", Style::default().fg(Color::DarkGray).bg(fill));
            }

            let label = Style::default().fg(Color::Black).bg(fill);
            buf.set_string(x + 1, area.bottom() - 2, &note.name, label);
            buf.set_string(
                x + 2,
                area.bottom() - 1,
                note.trigger.to_string(),
                label.add_modifier(Modifier::BOLD),
            );
        }

        for (id, note) in self.keyboard.notes.iter() {
            if note.color != KeyColor::Black {
                continue;
            }
            let boundary = self.keyboard.notes.white_keys_before(id);
            if boundary <= first || boundary >= last {
                continue;
            }
            let Some(x) = column(boundary) else {
                continue;
            };

            let fill = self.key_fill(id, note.octave, BLACK_KEY);
            let body = Rect::new(x - 1, keys_top, 3, BLACK_ROWS).intersection(area);
            buf.set_style(body, Style::default().bg(fill));
            buf.set_string(
                x,
                keys_top + BLACK_ROWS - 1,
                note.trigger.to_string(),
                Style::default().fg(Color::Gray).bg(fill),
            );
        }

        self.render_stage(Rect::new(area.x, area.y, area.width, keys_top - area.y), buf);
    }
}

impl KeyboardView<'_> {
    fn key_fill(&self, id: NoteId, octave: u8, idle: Color) -> Color {
        if self.active.is_active(id) {
            let (r, g, b) = saavy_piano::practice::visuals::octave_color(octave);
            Color::Rgb(r, g, b)
        } else if self.expected == Some(id) {
            HINT
        } else {
            idle
        }
    }

    fn render_stage(&self, stage: Rect, buf: &mut Buffer) {
        if stage.height == 0 {
            return;
        }
        let first = self.viewport.first() as f32 * WHITE_KEY_WIDTH;

        for anim in self.animations.iter() {
            let col = (anim.x - first) / WHITE_KEY_WIDTH * KEY_COLS as f32;
            let rise = (-anim.y * STAGE_ROWS_PER_UNIT).max(0.0);
            if col < 0.0 || col >= stage.width as f32 || rise >= stage.height as f32 {
                continue;
            }

            let x = stage.x + col as u16;
            let y = stage.bottom() - 1 - rise as u16;
            let fade = |c: u8| (c as f32 * anim.opacity.clamp(0.0, 1.0)) as u8;
            let (r, g, b) = anim.color;
            let glyph = if anim.scale < 1.25 { "♪" } else { "♫" };
            buf.set_string(
                x,
                y,
                glyph,
                Style::default().fg(Color::Rgb(fade(r), fade(g), fade(b))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_triggers_under_white_keys() {
        let keyboard = Keyboard::standard().unwrap();
        let active = ActiveNotes::new();
        let animations = NoteAnimations::new();
        let mut viewport = Viewport::new(keyboard.notes.white_key_count());
        viewport.set_visible(7);

        let area = Rect::new(0, 0, 35, 10);
        let mut buf = Buffer::empty(area);
        KeyboardView {
            keyboard: &keyboard,
            active: &active,
            expected: None,
            animations: &animations,
            viewport: &viewport,
        }
        .render(area, &mut buf);

        let bottom: String = (0..area.width)
            .map(|x| buf[(x, area.bottom() - 1)].symbol().to_string())
            .collect();
        assert_eq!(bottom, "│ q  │ w  │ e  │ r  │ t  │ y  │ u  ");
    }

    #[test]
    fn fits_whole_keys_only() {
        assert_eq!(visible_keys(36), 7);
        assert_eq!(visible_keys(2), 1);
    }
}
