//! invite-core — validation and outcome classification for org invitations.
//!
//! Public API surface:
//! - [`types`] — request, policy, issue and outcome types
//! - [`error`] — [`InviteError`] and the per-stage error enums
//! - [`inputs`] — parsing of action inputs, repository context and event payload
//! - [`config`] — policy document fetch + decode
//! - [`policy`] — email-domain and trusted-requester rules
//! - [`invitation`] — create the invitation and classify failures
//! - [`reporter`] — label + comment feedback on the originating issue
//! - [`pipeline`] — the single-pass run and its step-output contract
//! - [`platform`] — traits the hosting platform client implements

pub mod config;
pub mod error;
pub mod inputs;
pub mod invitation;
pub mod pipeline;
pub mod platform;
pub mod policy;
pub mod reporter;
pub mod types;

pub use error::{ApiError, ConfigError, InputError, InviteError, PolicyDenied};
pub use pipeline::{RunContext, StepOutcome, StepStatus};
pub use platform::{ContentStore, CreateInvitation, IssueTracker, OrgInvitations, Platform};
pub use types::{
    ActionInputs, Invitation, InvitationOutcome, InvitationRequest, IssueContext, IssueFeedback,
    PolicyConfig, RepoRef, Rule, UserRole,
};
