//! Real-world scenario benchmarks.
//!
//! A single struck key, and the full synth rendering chords the way the
//! audio callback does.

mod piano;

pub use piano::{bench_piano_voice, bench_poly_synth};
