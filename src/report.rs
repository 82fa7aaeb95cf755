//! Terminal rendering of compiled scores

use colored::*;
use mu_core::{Compilation, Diagnostic, ParseError, Tone};

/// One line per tone: index, name, pitch, frequency, seconds
pub fn render_tones(tones: &[Tone]) -> String {
    let header = format!(
        "{:>5}  {:<5} {:>6} {:>10} {:>10}",
        "#", "note", "pitch", "freq (Hz)", "seconds"
    );
    let mut out = format!("{}\n", header.bold());
    for (index, tone) in tones.iter().enumerate() {
        let line = match (tone.pitch, tone.name(), tone.frequency()) {
            (Some(pitch), Some(name), Some(freq)) => format!(
                "{:>5}  {:<5} {:>6} {:>10.2} {:>10.3}",
                index + 1,
                name.cyan(),
                pitch,
                freq,
                tone.seconds_f64()
            ),
            _ => format!(
                "{:>5}  {:<5} {:>6} {:>10} {:>10.3}",
                index + 1,
                "rest".dimmed(),
                "-",
                "-",
                tone.seconds_f64()
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    format!("{} {}", "Warning:".yellow().bold(), diagnostic)
}

pub fn render_parse_error(error: &ParseError) -> String {
    format!("{} {}", "Error:".red().bold(), error)
}

/// Count and total length
pub fn render_summary(compilation: &Compilation) -> String {
    let total = compilation.total_seconds();
    format!(
        "{} tones, {} s ({} s exact), {} warnings",
        compilation.tones.len().to_string().green(),
        format!("{:.3}", mu_core::rational::to_f64(&total)).green(),
        total,
        compilation.diagnostics.len()
    )
}
