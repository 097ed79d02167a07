// Purpose: Voice management, polyphony, and the tone-source seam
// This layer sits above graph nodes and manages multiple voices

pub mod factory;
pub mod message;
pub mod poly;
pub mod tone;
pub mod voice;

pub use message::{MessageReceiver, ToneMessage};
pub use poly::{PolySynth, VoiceMeter};
#[cfg(feature = "rtrb")]
pub use tone::SynthToneSource;
pub use tone::{SilentToneSource, ToneHandle, ToneShape, ToneSource};
