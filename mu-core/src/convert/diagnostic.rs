//! Non-fatal problems found while converting a score.

use crate::rational::Rational;
use crate::score::Metre;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A measure's notes do not add up to its time signature
    MeasureDuration {
        passage: u32,
        measure: u32,
        expected: Metre,
        actual: Rational,
    },
    /// A tie with nothing before it in the passage; played as a rest
    TieAtStart { passage: u32 },
    /// The play order names a passage that does not exist; skipped
    MissingPassage { passage: u32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MeasureDuration {
                passage,
                measure,
                expected,
                actual,
            } => write!(
                f,
                "Passage {}, Measure {} has wrong time signature, expected {}, got {}",
                passage, measure, expected, actual
            ),
            Diagnostic::TieAtStart { passage } => write!(
                f,
                "A tied note is found at the beginning of Passage {}, which is considered as a rest",
                passage
            ),
            Diagnostic::MissingPassage { passage } => {
                write!(f, "Passage {} not found, skipping", passage)
            }
        }
    }
}

/// Receives diagnostics as the converter finds them
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` as warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}
