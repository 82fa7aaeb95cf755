//! Command-line interface

use crate::report::{render_diagnostic, render_summary, render_tones};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mu")]
#[command(about = "Compile a numbered notation score into timed tones", long_about = None)]
pub struct Cli {
    /// Score file, or `-` to read standard input
    pub input: PathBuf,

    /// Print the compilation as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Do not print warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Read the score named on the command line
pub fn read_source(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read score from standard input")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read score file {}", input.display()))
    }
}

/// Compile the input and write the report to `out`, warnings to `err`
pub fn run(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let text = read_source(&cli.input)?;
    tracing::info!(path = %cli.input.display(), bytes = text.len(), "compiling score");
    let compilation = mu_core::compile(&text)
        .with_context(|| format!("Failed to compile {}", cli.input.display()))?;

    if !cli.quiet {
        for diagnostic in &compilation.diagnostics {
            writeln!(err, "{}", render_diagnostic(diagnostic))?;
        }
    }

    if cli.json {
        let json =
            serde_json::to_string_pretty(&compilation).context("Failed to encode compilation")?;
        writeln!(out, "{}", json)?;
    } else {
        write!(out, "{}", render_tones(&compilation.tones))?;
        writeln!(out, "{}", render_summary(&compilation))?;
    }
    Ok(())
}
