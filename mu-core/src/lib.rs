//! # Mu Core
//!
//! Compiler core for numbered musical notation ("jianpu"). Turns notation
//! text into a flat list of pitched, exactly timed tones.
//!
//! - `source`: text buffer with a restorable cursor
//! - `parser`: backtracking recursive-descent grammar producing a [`Score`]
//! - `score`: the score tree
//! - `convert`: pitch and duration resolution, play order, diagnostics
//!
//! ## Features
//!
//! - **serde**: Serialize/Deserialize for the tree, tones and diagnostics
//!
//! ## Example
//!
//! ```
//! let compiled = mu_core::compile("1=C 4/4 60 1 2 3 4||").unwrap();
//! assert_eq!(compiled.tones.len(), 4);
//! assert!(compiled.diagnostics.is_empty());
//! ```

pub mod convert;
pub mod parser;
pub mod pitch;
pub mod rational;
pub mod score;
pub mod source;

// Re-export commonly used types
pub use convert::{convert, Diagnostic, DiagnosticSink, Tone, TracingSink};
pub use parser::{parse, ParseError};
pub use rational::Rational;
pub use score::Score;

use num_traits::Zero;

/// Tones plus the diagnostics reported while producing them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Compilation {
    pub tones: Vec<Tone>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Exact length of the whole performance
    pub fn total_seconds(&self) -> Rational {
        self.tones
            .iter()
            .fold(Rational::zero(), |sum, tone| sum + &tone.seconds)
    }

    /// Diagnostics rendered as text
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }
}

/// Parse and convert notation text.
///
/// Syntax errors abort; semantic problems are collected in the result.
pub fn compile(text: &str) -> Result<Compilation, ParseError> {
    let score = parse(text)?;
    let mut diagnostics = Vec::new();
    let tones = convert(&score, &mut diagnostics);
    Ok(Compilation { tones, diagnostics })
}
