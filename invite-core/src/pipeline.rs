//! Single-pass run: config → policy → invitation, and the step-output
//! contract every run ends in.
//!
//! [`execute`] is the one place an error turns into a failed
//! [`StepOutcome`]; every stage below it raises.

use std::fmt;

use crate::config;
use crate::error::InviteError;
use crate::invitation;
use crate::platform::Platform;
use crate::policy::Policy;
use crate::types::{ActionInputs, Invitation, IssueContext, RepoRef};

/// Everything a run needs, built once at process entry.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub repo: RepoRef,
    pub inputs: ActionInputs,
    pub issue: IssueContext,
}

/// Where a run currently is. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigLoaded,
    PolicyChecked,
    InvitationAttempted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "start"),
            Stage::ConfigLoaded => write!(f, "config_loaded"),
            Stage::PolicyChecked => write!(f, "policy_checked"),
            Stage::InvitationAttempted => write!(f, "invitation_attempted"),
        }
    }
}

/// Run the pipeline and return the created invitation.
pub fn run<P: Platform + ?Sized>(platform: &P, ctx: &RunContext) -> Result<Invitation, InviteError> {
    tracing::debug!(stage = %Stage::Start, repo = %ctx.repo, issue = ctx.issue.number);

    let policy_config = config::fetch(platform, &ctx.repo, &ctx.inputs.config_path)?;
    tracing::debug!(stage = %Stage::ConfigLoaded, path = %ctx.inputs.config_path);

    Policy::compile(&policy_config)?
        .evaluate(&ctx.inputs.request, &ctx.issue)
        .into_result()?;
    tracing::debug!(stage = %Stage::PolicyChecked, "request allowed");

    let result = invitation::issue(platform, &ctx.inputs.request, &ctx.issue, &ctx.repo);
    tracing::debug!(stage = %Stage::InvitationAttempted, ok = result.is_ok());

    let invitation = result?;
    tracing::debug!(
        id = invitation.id,
        created_at = ?invitation.created_at,
        "invitation created"
    );
    Ok(invitation)
}

/// Run status surfaced to the invoking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Success => write!(f, "success"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The `message` / `stepStatus` pair. Exactly one is produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub message: String,
    pub status: StepStatus,
}

impl StepOutcome {
    pub fn invited(email: &str) -> Self {
        Self {
            message: format!("User with email {email} has been invited into the org."),
            status: StepStatus::Success,
        }
    }

    pub fn failed(error: &InviteError) -> Self {
        Self {
            message: error.to_string(),
            status: StepStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Run the pipeline and fold its result into a [`StepOutcome`]. Never fails.
pub fn execute<P: Platform + ?Sized>(platform: &P, ctx: &RunContext) -> StepOutcome {
    match run(platform, ctx) {
        Ok(_) => {
            let outcome = StepOutcome::invited(&ctx.inputs.request.email);
            tracing::info!("{}", outcome.message);
            outcome
        }
        Err(err) => conclude_failure(&err),
    }
}

/// Failed outcome for an error raised anywhere, including before a
/// [`RunContext`] could be built.
pub fn conclude_failure(err: &InviteError) -> StepOutcome {
    tracing::warn!(error = %err, retryable = err.is_retryable(), "run failed");
    StepOutcome::failed(err)
}
