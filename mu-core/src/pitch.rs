//! Scale degrees, letter names and their semitone tables.
//!
//! Pitches are integer semitone offsets from A above middle C (`A4 = 0`).

use std::fmt;

/// Movable-do scale degree 1-7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solfa(u8);

impl Solfa {
    const SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

    /// Create a degree from 1-7
    pub fn new(degree: u8) -> Option<Self> {
        (1..=7).contains(&degree).then_some(Solfa(degree))
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Solfa::new(d as u8))
    }

    pub fn degree(self) -> u8 {
        self.0
    }

    /// Zero-based index, for per-degree tables
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Semitones above degree 1
    pub fn semitones(self) -> i32 {
        Self::SEMITONES[self.index()]
    }
}

impl fmt::Display for Solfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Letter name used on the right-hand side of a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alpha {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Alpha {
    pub fn from_char(c: char) -> Option<Alpha> {
        match c {
            'C' => Some(Alpha::C),
            'D' => Some(Alpha::D),
            'E' => Some(Alpha::E),
            'F' => Some(Alpha::F),
            'G' => Some(Alpha::G),
            'A' => Some(Alpha::A),
            'B' => Some(Alpha::B),
            _ => None,
        }
    }

    /// Semitones relative to A
    pub fn semitones(self) -> i32 {
        match self {
            Alpha::C => -9,
            Alpha::D => -7,
            Alpha::E => -5,
            Alpha::F => -4,
            Alpha::G => -2,
            Alpha::A => 0,
            Alpha::B => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Alpha::C => "C",
            Alpha::D => "D",
            Alpha::E => "E",
            Alpha::F => "F",
            Alpha::G => "G",
            Alpha::A => "A",
            Alpha::B => "B",
        }
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Table offset shifted by accidental and octave
#[inline]
pub fn offset(semitones: i32, accidental: i32, octave: i32) -> i32 {
    semitones + accidental + 12 * octave
}

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name of an absolute pitch, e.g. `-9` is `"C4"`
pub fn pitch_name(pitch: i32) -> String {
    let from_c0 = pitch + 9 + 12 * 4;
    format!(
        "{}{}",
        PITCH_NAMES[from_c0.rem_euclid(12) as usize],
        from_c0.div_euclid(12)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solfa_range() {
        assert!(Solfa::new(0).is_none());
        assert!(Solfa::new(8).is_none());
        assert_eq!(Solfa::from_char('5').map(Solfa::semitones), Some(7));
        assert_eq!(Solfa::from_char('0'), None);
        assert_eq!(Solfa::from_char('x'), None);
    }

    #[test]
    fn test_alpha_table_is_relative_to_a() {
        assert_eq!(Alpha::A.semitones(), 0);
        assert_eq!(Alpha::C.semitones(), -9);
        assert_eq!(Alpha::B.semitones(), 2);
        assert_eq!(Alpha::from_char('c'), None);
    }

    #[test]
    fn test_offset_applies_accidental_and_octave() {
        assert_eq!(offset(Solfa::new(7).unwrap().semitones(), -1, 1), 22);
        assert_eq!(offset(Alpha::C.semitones(), 1, -1), -20);
    }

    #[test]
    fn test_pitch_names() {
        assert_eq!(pitch_name(0), "A4");
        assert_eq!(pitch_name(-9), "C4");
        assert_eq!(pitch_name(3), "C5");
        assert_eq!(pitch_name(-8), "C#4");
        assert_eq!(pitch_name(-10), "B3");
    }
}
