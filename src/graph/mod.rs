//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs:
//! note events and block-based rendering. The `extensions` module adds fluent
//! helpers so a tone can be described as a chain.

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Exponential-decay envelope node.
pub mod envelope;
/// Fluent combinators (`.amplify()`).
pub mod extensions;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
