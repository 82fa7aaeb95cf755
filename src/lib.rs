//! # Mu
//!
//! Command-line front end for `mu-core`: reads a numbered notation score,
//! compiles it and prints the resulting tones and warnings.
//!
//! ## Modules
//!
//! - `cli`: argument parsing and the compile command
//! - `report`: coloured terminal rendering of tones, warnings and errors

pub mod cli;
pub mod report;

pub use cli::{run, Cli};
