//! Source buffer with a restorable cursor
//!
//! The parser saves a [`Position`] before every attempt and seeks back to it
//! on failure, so backtracking is a plain integer reset over borrowed text.

use std::fmt;

/// Byte offset of the cursor inside the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position(pub usize);

/// 1-based line and column (counted in characters) of a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Immutable notation text plus a movable cursor
#[derive(Debug, Clone)]
pub struct SourceBuffer<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> SourceBuffer<'a> {
    pub fn new(text: &'a str) -> Self {
        SourceBuffer { text, cursor: 0 }
    }

    /// Current cursor position
    #[inline]
    pub fn tell(&self) -> Position {
        Position(self.cursor)
    }

    /// Move the cursor back (or forward) to a previously told position
    #[inline]
    pub fn seek(&mut self, position: Position) {
        self.cursor = position.0.min(self.text.len());
    }

    /// The next `n` characters without consuming them.
    /// Shorter (possibly empty) near the end of the text.
    pub fn peek(&self, n: usize) -> &'a str {
        let rest = &self.text[self.cursor..];
        match rest.char_indices().nth(n) {
            Some((end, _)) => &rest[..end],
            None => rest,
        }
    }

    /// The next character, if any
    #[inline]
    pub fn peek_char(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    /// Consume up to `n` characters
    pub fn advance(&mut self, n: usize) {
        self.cursor += self.peek(n).len();
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Skip whitespace (newlines included)
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.cursor += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Line and column of `position`, from the text consumed up to it
    pub fn locate(&self, position: Position) -> Location {
        let consumed = &self.text[..position.0.min(self.text.len())];
        let line = consumed.matches('\n').count() + 1;
        let last = consumed.rsplit('\n').next().unwrap_or("");
        Location {
            line,
            column: last.chars().count() + 1,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}
