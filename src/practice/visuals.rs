//! Floating-note animations
//!
//! Every played note releases a coloured marker from the top of its key. The
//! marker drifts up, fades and grows a little on each animation tick, and is
//! dropped once it is fully transparent. Purely cosmetic: nothing here feeds
//! back into playback or judging.

use crate::keyboard::{Note, NoteId};

/// Upward movement per tick, in white-key widths.
pub const RISE_PER_TICK: f32 = 0.04;
pub const FADE_PER_TICK: f32 = 0.01;
pub const GROWTH_PER_TICK: f32 = 0.005;

const SATURATION: f32 = 0.8;
const LIGHTNESS: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteAnimation {
    pub id: u64,
    pub note: NoteId,
    /// Layout position; see [`crate::keyboard::Keyboard::key_anchor`]
    pub x: f32,
    pub y: f32,
    pub color: (u8, u8, u8),
    pub opacity: f32,
    pub scale: f32,
}

/// Hue for an octave: 60 degrees per octave starting at red for octave 2.
pub fn octave_hue(octave: u8) -> f32 {
    ((octave as i32 - 2).rem_euclid(6) * 60) as f32
}

/// Display colour for a note of `octave`.
pub fn octave_color(octave: u8) -> (u8, u8, u8) {
    hsl_to_rgb(octave_hue(octave), SATURATION, LIGHTNESS)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

#[derive(Debug, Default, Clone)]
pub struct NoteAnimations {
    live: Vec<NoteAnimation>,
    next_id: u64,
}

impl NoteAnimations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release a marker for `note` at `anchor` (the top-centre of its key).
    pub fn spawn(&mut self, id: NoteId, note: &Note, anchor: (f32, f32)) -> u64 {
        let anim_id = self.next_id;
        self.next_id += 1;

        self.live.push(NoteAnimation {
            id: anim_id,
            note: id,
            x: anchor.0,
            y: anchor.1,
            color: octave_color(note.octave),
            opacity: 1.0,
            scale: 1.0,
        });
        anim_id
    }

    /// Move every marker one frame on and drop the ones that have faded out.
    pub fn tick(&mut self) {
        for anim in &mut self.live {
            anim.y -= RISE_PER_TICK;
            anim.opacity -= FADE_PER_TICK;
            anim.scale += GROWTH_PER_TICK;
        }
        self.live.retain(|anim| anim.opacity > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteAnimation> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyColor;

    fn c4() -> Note {
        Note::new("C4", 261.63, 'b', KeyColor::White, 4)
    }

    #[test]
    fn each_octave_gets_its_own_hue() {
        let hues: Vec<f32> = (2..=6).map(octave_hue).collect();
        assert_eq!(hues, vec![0.0, 60.0, 120.0, 180.0, 240.0]);
        assert_eq!(octave_hue(8), 0.0);
    }

    #[test]
    fn octave_two_is_red() {
        let (r, g, b) = octave_color(2);
        assert_eq!((r, g, b), (235, 71, 71));
    }

    #[test]
    fn tick_rises_fades_and_grows() {
        let mut anims = NoteAnimations::new();
        anims.spawn(NoteId(24), &c4(), (14.5, 0.0));
        anims.tick();

        let anim = anims.iter().next().unwrap();
        assert!(anim.y < 0.0);
        assert!(anim.opacity < 1.0);
        assert!(anim.scale > 1.0);
        assert_eq!(anim.x, 14.5);
    }

    #[test]
    fn faded_markers_are_dropped() {
        let mut anims = NoteAnimations::new();
        anims.spawn(NoteId(24), &c4(), (0.5, 0.0));

        for _ in 0..90 {
            anims.tick();
        }
        assert_eq!(anims.len(), 1);

        for _ in 0..20 {
            anims.tick();
        }
        assert!(anims.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut anims = NoteAnimations::new();
        let a = anims.spawn(NoteId(1), &c4(), (0.0, 0.0));
        let b = anims.spawn(NoteId(1), &c4(), (0.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(anims.len(), 2);
    }
}
