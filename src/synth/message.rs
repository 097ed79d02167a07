use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::tone::ToneHandle;

/// Control messages from the UI thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ToneMessage {
    /// Strike a new tone instance.
    Play { tone: ToneHandle, frequency: f32 },
    /// Cut one instance short. Unknown or already finished handles are ignored.
    Stop { tone: ToneHandle },
    /// Silence everything (mute, shutdown).
    StopAll,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ToneMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ToneMessage> {
    fn pop(&mut self) -> Option<ToneMessage> {
        Consumer::pop(self).ok()
    }
}

/// Offline rendering and tests feed the synth from a plain queue.
impl MessageReceiver for VecDeque<ToneMessage> {
    fn pop(&mut self) -> Option<ToneMessage> {
        self.pop_front()
    }
}
