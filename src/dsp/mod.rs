//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math so graph combinators can layer on note events.

/// Exponential-decay amplitude envelope.
pub mod envelope;
/// Oscillator waveforms.
pub mod oscillator;

pub use envelope::EnvelopeState;
pub use oscillator::OscillatorWaveform;
