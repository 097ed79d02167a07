use thiserror::Error;

/// Errors raised by the piano core.
///
/// None of these are fatal: an operation that fails leaves every state machine
/// exactly where it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PianoError {
    #[error("unknown song: {0}")]
    UnknownSong(String),

    #[error("song '{song}' references unknown note '{note}'")]
    UnknownNote { song: String, note: String },

    #[error("song '{song}' has {notes} notes but {durations} durations")]
    MismatchedDurations {
        song: String,
        notes: usize,
        durations: usize,
    },

    #[error("song '{song}' has an unplayable duration at index {index}")]
    InvalidDuration { song: String, index: usize },

    #[error("song '{song}' has an unplayable tempo")]
    InvalidTempo { song: String },

    #[error("invalid speed multiplier: {0}")]
    InvalidSpeed(f64),

    #[error("no note is bound to key '{0}'")]
    UnknownTrigger(char),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
}
