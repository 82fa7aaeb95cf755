// mu-core/src/parser/mod.rs

pub mod error;
pub mod grammar;

pub use error::{Failure, ParseError};
pub use grammar::{parse, Parser};
