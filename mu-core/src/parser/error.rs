use crate::source::{Location, Position, SourceBuffer};
use std::fmt;

/// Syntax error with the position where the expectation failed
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseError {
    pub message: String,
    pub position: Position,
    pub location: Location,
}

impl ParseError {
    pub fn new(message: String, position: Position, location: Location) -> Self {
        Self {
            message,
            position,
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

impl std::error::Error for ParseError {}

/// An expectation a single rule could not meet, before it is placed on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub position: Position,
}

impl Failure {
    pub fn new(message: String, position: Position) -> Self {
        Self { message, position }
    }

    /// Attach the line and column of the failure within `buf`
    pub fn locate(self, buf: &SourceBuffer<'_>) -> ParseError {
        let location = buf.locate(self.position);
        ParseError::new(self.message, self.position, location)
    }
}

