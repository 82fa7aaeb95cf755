//! Sound events produced by the converter.

use crate::pitch::pitch_name;
use crate::rational::{to_f64, Rational};
use num_traits::Zero;

/// Concert A, the pitch that `0` refers to
pub const REFERENCE_FREQUENCY: f64 = 440.0;

/// One sounding (or silent) event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tone {
    /// Semitones from A4, `None` for silence
    pub pitch: Option<i32>,
    /// Exact length in seconds
    pub seconds: Rational,
}

impl Tone {
    /// A pitched tone of zero length, extended as notes are added
    pub fn pitched(pitch: i32) -> Self {
        Tone {
            pitch: Some(pitch),
            seconds: Rational::zero(),
        }
    }

    /// A silent tone of zero length
    pub fn rest() -> Self {
        Tone {
            pitch: None,
            seconds: Rational::zero(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    #[inline]
    pub fn seconds_f64(&self) -> f64 {
        to_f64(&self.seconds)
    }

    /// Frequency in Hz, `440 * 2^(pitch/12)`
    pub fn frequency(&self) -> Option<f64> {
        self.pitch
            .map(|p| REFERENCE_FREQUENCY * 2f64.powf(p as f64 / 12.0))
    }

    /// Pitch class counted from A (0-11), for keyboard display
    pub fn key_index(&self) -> Option<u8> {
        self.pitch.map(|p| p.rem_euclid(12) as u8)
    }

    /// Display name with octave (e.g. "C#4")
    pub fn name(&self) -> Option<String> {
        self.pitch.map(pitch_name)
    }
}
