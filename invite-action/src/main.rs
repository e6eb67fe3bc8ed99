//! invite-user — org invitation step for issue-driven workflows.
//!
//! # Usage
//!
//! ```text
//! ADMIN_TOKEN=... GITHUB_REPOSITORY=owner/repo GITHUB_EVENT_PATH=event.json \
//!   INPUT_EMAIL=user@example.com INPUT_CONFIG_PATH=.github/invite.json invite-user
//! ```
//!
//! Exit code is 0 when the invitation was created and 1 otherwise; the
//! `message` / `stepStatus` outputs are written in both cases.

mod cli;
mod outputs;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use invite_core::{pipeline, InviteError};

use cli::Settings;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let settings = Settings::parse();
    init_tracing(settings.debug);

    let outcome = match settings.prepare() {
        Ok((client, ctx)) => pipeline::execute(&client, &ctx),
        Err(err) => pipeline::conclude_failure(&InviteError::from(err)),
    };

    outputs::emit(&outcome, settings.github_output.as_deref())?;

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// `RUST_LOG` wins; otherwise `debug` when the runner asks for debug logs.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
