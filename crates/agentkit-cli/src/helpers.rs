//! Shared CLI output helpers.

use anyhow::{Context, Result};
use colored::Colorize;

/// Print generated text to stdout.
pub fn print_generation(text: &str) {
    if text.is_empty() {
        eprintln!("{}", "(empty response)".dimmed());
    } else {
        println!("{text}");
    }
}

/// Print an embedding as a JSON array on stdout and its dimension on stderr.
pub fn print_embedding(vector: &[f64]) -> Result<()> {
    println!("{}", embedding_json(vector)?);
    eprintln!("{}", format!("dimensions: {}", vector.len()).dimmed());
    Ok(())
}

fn embedding_json(vector: &[f64]) -> Result<String> {
    serde_json::to_string(vector).context("failed to serialize embedding")
}

/// A `✓`/`·` status marker followed by `detail`.
pub fn status_line(ok: bool, detail: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), detail)
    } else {
        format!("{}", format!("· {detail}").dimmed())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
