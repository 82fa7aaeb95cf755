//! Score tree produced by the parser.
//!
//! Nodes are plain owned data and never change after parsing; the converter
//! only reads them.

use crate::pitch::{offset, Alpha, Solfa};
use crate::rational::{pow2, rational, whole, Rational};
use std::fmt;

// ============================================================================
// Structure
// ============================================================================

/// A whole score: groups plus an optional replay order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    pub groups: Vec<Group>,
    /// Passage numbers to play, `None` plays every passage once in order
    pub order: Option<Vec<u32>>,
}

impl Score {
    /// Every passage with its global 1-based number and owning group
    pub fn passages(&self) -> impl Iterator<Item = (u32, &Group, &Passage)> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.passages.iter().map(move |passage| (group, passage)))
            .zip(1u32..)
            .map(|((group, passage), number)| (number, group, passage))
    }

    pub fn passage_count(&self) -> usize {
        self.groups.iter().map(|g| g.passages.len()).sum()
    }
}

/// Passages sharing a mode, metre and tempo
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub mode: Mode,
    pub metre: Metre,
    /// Beats per minute
    pub bpm: u32,
    pub passages: Vec<Passage>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passage {
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    pub elements: Vec<Element>,
}

// ============================================================================
// Elements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// Note with its duration marks: `3/.`
    TimedNote(Note, Time),
    /// Grouping at the same base: `{1 2}`
    Braced(Vec<Element>),
    /// Children at half the base: `<1 2>`
    Angled(Vec<Element>),
    /// Base divided by the ratio: `[3:2]{1 2 3}`
    Rated(Ratio, Box<Element>),
}

/// Tuplet ratio `[n:d]` or `[n]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ratio {
    pub n: u32,
    pub d: Option<u32>,
}

impl Ratio {
    /// Explicit denominator, or the largest power of two not above `n`
    pub fn denominator(&self) -> u32 {
        self.d.unwrap_or_else(|| 1 << (u32::BITS - 1 - self.n.max(1).leading_zeros()))
    }

    /// `n/d` as an exact value
    pub fn value(&self) -> Rational {
        rational(self.n as i64, self.denominator() as i64)
    }
}

/// Duration marks: `und` halvings and `dot` dots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub und: u32,
    pub dot: u32,
}

impl Time {
    /// `(1/2^und) * (2 - 1/2^dot)`
    pub fn multiplier(&self) -> Rational {
        (whole(2) - whole(1) / pow2(self.dot)) / pow2(self.und)
    }
}

// ============================================================================
// Notes and pitches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Note {
    /// `0`
    Rest,
    /// `-`, extends the previous tone
    Tied,
    Sao(Sao),
}

/// Scale degree with accidental and octave: `#4'`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sao {
    pub solfa: Solfa,
    /// `None` inherits the measure's accidental for this degree
    pub accidental: Option<i32>,
    pub octave: i32,
}

impl Sao {
    /// Semitones above degree 1 of the reference octave, with a resolved accidental
    pub fn semitones_with(&self, accidental: i32) -> i32 {
        offset(self.solfa.semitones(), accidental, self.octave)
    }
}

/// Letter name with accidental and octave: `Eb,`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aao {
    pub alpha: Alpha,
    pub accidental: Option<i32>,
    pub octave: i32,
}

impl Aao {
    /// Absolute pitch relative to A4
    pub fn semitones(&self) -> i32 {
        offset(
            self.alpha.semitones(),
            self.accidental.unwrap_or(0),
            self.octave,
        )
    }
}

/// `sao=aao`: the degree `sao` sounds at the letter pitch `aao`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mode {
    pub sao: Sao,
    pub aao: Aao,
}

impl Mode {
    /// Semitones added to every relative degree pitch in the group
    pub fn transposition(&self) -> i32 {
        self.aao.semitones() - self.sao.semitones_with(self.sao.accidental.unwrap_or(0))
    }
}

/// Time signature `n/d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metre {
    pub n: u32,
    pub d: u32,
}

impl Metre {
    pub fn fraction(&self) -> Rational {
        rational(self.n as i64, self.d as i64)
    }
}

impl fmt::Display for Metre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}
