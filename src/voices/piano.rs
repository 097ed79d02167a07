//! Piano voice - a struck tone with no sustain.
//!
//! # How It Works
//!
//! 1. One oscillator (sine unless configured otherwise) at the key's frequency
//! 2. Instant attack: the first sample is already at peak gain
//! 3. Exponential decay from peak towards the floor over the decay window
//! 4. The voice itself is cut off by the synth after the sounding window
//!
//! # Variations
//!
//! - Triangle wave = brighter, music-box like
//! - Longer decay = more ring left when the window closes
//! - Lower peak = more headroom for dense chords

use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode, GraphNode};
use crate::synth::tone::ToneShape;

/// Create a piano voice from a tone shape.
pub fn piano(shape: &ToneShape) -> impl GraphNode {
    OscNode::new(shape.waveform).amplify(EnvNode::exponential(
        shape.peak_gain,
        shape.floor_gain,
        shape.decay.as_secs_f32(),
    ))
}
