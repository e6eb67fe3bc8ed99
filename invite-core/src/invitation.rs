//! Create the org invitation and classify what went wrong.
//!
//! [`attempt`] makes the single create call and turns its result into an
//! [`InvitationOutcome`]. [`issue`] additionally writes issue feedback for
//! failures and raises the original error once that write has finished.

use crate::error::{ApiError, InviteError, RATE_LIMIT_MESSAGE};
use crate::platform::{CreateInvitation, IssueTracker, OrgInvitations};
use crate::reporter;
use crate::types::{
    Invitation, InvitationOutcome, InvitationRequest, IssueContext, IssueFeedback, RepoRef,
};

/// Map a create-invitation result onto the three outcomes.
pub fn classify(result: Result<Invitation, ApiError>) -> InvitationOutcome {
    match result {
        Ok(invitation) => InvitationOutcome::Success {
            invitation_id: invitation.id,
            created_at: invitation.created_at,
        },
        Err(ApiError::RateLimited) => InvitationOutcome::RetryableFailure {
            reason: RATE_LIMIT_MESSAGE.to_string(),
        },
        Err(error) => InvitationOutcome::TerminalFailure {
            reason: error.to_string(),
            error,
        },
    }
}

/// The feedback to write for a failed outcome; `None` on success.
pub fn feedback_for(
    outcome: &InvitationOutcome,
    request: &InvitationRequest,
    issue: &IssueContext,
    repo: &RepoRef,
) -> Option<IssueFeedback> {
    match outcome {
        InvitationOutcome::Success { .. } => None,
        InvitationOutcome::RetryableFailure { .. } => {
            Some(IssueFeedback::retry(repo, issue.number))
        }
        InvitationOutcome::TerminalFailure { .. } => Some(IssueFeedback::automation_failed(
            repo,
            issue.number,
            &request.owners,
        )),
    }
}

/// One create call in the org that owns `repo`.
pub fn attempt<I: OrgInvitations + ?Sized>(
    invitations: &I,
    request: &InvitationRequest,
    repo: &RepoRef,
) -> InvitationOutcome {
    let invite = CreateInvitation {
        org: repo.owner.clone(),
        email: request.email.clone(),
        role: request.role,
    };
    classify(invitations.create_invitation(&invite))
}

/// Attempt the invitation; on failure write issue feedback, then raise.
///
/// A rate-limited attempt raises [`ApiError::RateLimited`]; anything else
/// raises the platform error unchanged. If the feedback write itself fails,
/// that error is raised instead as [`InviteError::Feedback`].
pub fn issue<P: OrgInvitations + IssueTracker + ?Sized>(
    platform: &P,
    request: &InvitationRequest,
    issue: &IssueContext,
    repo: &RepoRef,
) -> Result<Invitation, InviteError> {
    let outcome = attempt(platform, request, repo);

    if let Some(feedback) = feedback_for(&outcome, request, issue, repo) {
        tracing::warn!(issue = issue.number, outcome = ?outcome, "invitation failed");
        reporter::report(platform, &feedback).map_err(InviteError::Feedback)?;
    }

    match outcome {
        InvitationOutcome::Success {
            invitation_id,
            created_at,
        } => Ok(Invitation {
            id: invitation_id,
            created_at,
        }),
        InvitationOutcome::RetryableFailure { .. } => {
            Err(InviteError::Invitation(ApiError::RateLimited))
        }
        InvitationOutcome::TerminalFailure { error, .. } => Err(InviteError::Invitation(error)),
    }
}
