use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::PianoError,
    practice::sequencer::{check_speed, MAX_SPEED, MIN_SPEED},
    synth::ToneShape,
};

/// Tunables for a [`Piano`](crate::Piano) session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PianoConfig {
    pub tone: ToneShape,
    pub initial_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Speed change per `nudge_speed` step.
    pub speed_step: f64,
    /// Restart auto-play after the last note.
    pub looping: bool,
    /// Voice pool size for the audio engine.
    pub max_voices: usize,
    /// Frame interval of the note animations.
    pub animation_tick: Duration,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            tone: ToneShape::default(),
            initial_speed: 1.0,
            min_speed: 0.5,
            max_speed: 2.0,
            speed_step: 0.1,
            looping: true,
            max_voices: 32,
            animation_tick: Duration::from_millis(16),
        }
    }
}

impl PianoConfig {
    pub fn validate(&self) -> Result<(), PianoError> {
        let positive = |x: f64| x.is_finite() && x > 0.0;

        if !positive(self.speed_step)
            || check_speed(self.min_speed).is_err()
            || check_speed(self.max_speed).is_err()
        {
            return Err(PianoError::InvalidConfig(format!(
                "speed limits must lie in {MIN_SPEED}..={MAX_SPEED} and the step must be positive"
            )));
        }
        if self.min_speed > self.max_speed {
            return Err(PianoError::InvalidConfig(format!(
                "min speed {} is above max speed {}",
                self.min_speed, self.max_speed
            )));
        }
        check_speed(self.initial_speed)?;
        if !(self.tone.peak_gain > 0.0
            && self.tone.floor_gain > 0.0
            && self.tone.floor_gain < self.tone.peak_gain)
        {
            return Err(PianoError::InvalidConfig(
                "tone gains must satisfy 0 < floor < peak".into(),
            ));
        }
        if self.tone.decay.is_zero() || self.tone.sounding.is_zero() {
            return Err(PianoError::InvalidConfig(
                "tone decay and sounding window must be non-zero".into(),
            ));
        }
        if self.max_voices == 0 {
            return Err(PianoError::InvalidConfig("need at least one voice".into()));
        }
        if self.animation_tick.is_zero() {
            return Err(PianoError::InvalidConfig(
                "animation tick must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
