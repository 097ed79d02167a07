//! Pre-built voices.
//!
//! # Example
//!
//! ```ignore
//! use saavy_piano::{synth::ToneShape, voices};
//!
//! let voice = voices::piano(&ToneShape::default());
//! ```

mod piano;

pub use piano::piano;
