//! Step outputs and workflow commands.
//!
//! `message` and `stepStatus` go to the `GITHUB_OUTPUT` file when the runner
//! provides one, otherwise to stdout as legacy `::set-output` commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use invite_core::StepOutcome;

/// Write both outputs, plus an `::error::` annotation for a failed run.
pub fn emit(outcome: &StepOutcome, output_file: Option<&Path>) -> Result<()> {
    let status = outcome.status.to_string();
    let outputs = [
        ("message", outcome.message.as_str()),
        ("stepStatus", status.as_str()),
    ];

    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open output file {}", path.display()))?;
            for (name, value) in outputs {
                file.write_all(output_entry(name, value).as_bytes())
                    .with_context(|| format!("cannot write output '{name}'"))?;
            }
        }
        None => {
            for (name, value) in outputs {
                println!("::set-output name={name}::{}", escape_data(value));
            }
        }
    }

    if !outcome.is_success() {
        println!("::error::{}", escape_data(&outcome.message));
    }
    Ok(())
}

/// One `GITHUB_OUTPUT` entry; multi-line values use the heredoc form.
fn output_entry(name: &str, value: &str) -> String {
    if value.contains(['\n', '\r']) {
        let delimiter = format!(
            "ghadelimiter_{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
