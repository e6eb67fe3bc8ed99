//! Domain types for the invitation workflow.
//!
//! Everything here is built once per run and never mutated afterwards.
//! Wire-facing types derive serde with the platform's field names.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, InputError};

/// Label applied when the invitation should be attempted again later.
pub const RETRY_LABEL: &str = "retry";

/// Label applied when an org admin has to action the request by hand.
pub const AUTOMATION_FAILED_LABEL: &str = "automation-failed";

// ---------------------------------------------------------------------------
// Repository reference
// ---------------------------------------------------------------------------

/// An `owner/repo` pair. The owner doubles as the organization invitations
/// are created in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoRef {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(InputError::ContextMalformed(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy document
// ---------------------------------------------------------------------------

/// A single regex rule in the policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub regex: String,
}

/// The remotely stored policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    pub email_domain_rule: Rule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_user_rule: Option<Rule>,
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Org role requested for the invitee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    DirectMember,
    BillingManager,
    /// No role given; the platform picks its default.
    #[default]
    Unspecified,
}

impl UserRole {
    pub fn is_unspecified(&self) -> bool {
        matches!(self, UserRole::Unspecified)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::DirectMember => write!(f, "direct_member"),
            UserRole::BillingManager => write!(f, "billing_manager"),
            UserRole::Unspecified => write!(f, "unspecified"),
        }
    }
}

impl FromStr for UserRole {
    type Err = InputError;

    /// Blank input maps to [`UserRole::Unspecified`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(UserRole::Unspecified),
            "admin" => Ok(UserRole::Admin),
            "direct_member" => Ok(UserRole::DirectMember),
            "billing_manager" => Ok(UserRole::BillingManager),
            _ => Err(InputError::InvalidRole(s.to_string())),
        }
    }
}

/// What is being asked for: who to invite, with which role, and who to CC
/// when automation gives up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRequest {
    pub email: String,
    pub role: UserRole,
    /// `@`-prefixed handles, in input order.
    pub owners: Vec<String>,
}

/// All action inputs after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    pub request: InvitationRequest,
    /// Repository-relative path of the policy document.
    pub config_path: String,
}

// ---------------------------------------------------------------------------
// Issue payload
// ---------------------------------------------------------------------------

/// Author of the triggering issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueUser {
    pub login: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `issue` object of the triggering event. Only `number` and
/// `user.login` take part in any decision; everything else rides along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueContext {
    pub number: u64,
    pub user: IssueUser,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IssueContext {
    pub fn new(number: u64, requester_login: impl Into<String>) -> Self {
        Self {
            number,
            user: IssueUser {
                login: requester_login.into(),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn requester_login(&self) -> &str {
        &self.user.login
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A created org invitation, as returned by the platform.
///
/// Both fields are informational: a created invitation is a success even
/// when the platform's reply omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of one invitation attempt. Exactly one is produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationOutcome {
    Success {
        invitation_id: u64,
        created_at: Option<DateTime<Utc>>,
    },
    /// Expected to succeed if the run is re-triggered later.
    RetryableFailure { reason: String },
    /// Needs a human before anything else is tried.
    TerminalFailure { reason: String, error: ApiError },
}

impl InvitationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvitationOutcome::Success { .. })
    }
}

/// Label + comment to write back onto the originating issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFeedback {
    pub repo: RepoRef,
    pub issue_number: u64,
    pub labels: Vec<String>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repo_ref_parses_owner_and_repo() {
        let repo: RepoRef = "ActionsDesk/invite-user".parse().expect("parse");
        assert_eq!(repo.owner, "ActionsDesk");
        assert_eq!(repo.repo, "invite-user");
        assert_eq!(repo.to_string(), "ActionsDesk/invite-user");
    }

    #[test]
    fn repo_ref_rejects_missing_separator() {
        for raw in ["ActionsDesk", "/invite-user", "ActionsDesk/", "a/b/c", ""] {
            assert!(
                matches!(raw.parse::<RepoRef>(), Err(InputError::ContextMalformed(_))),
                "expected '{raw}' to be rejected"
            );
        }
    }

    #[test]
    fn role_parsing() {
        assert_eq!("admin".parse::<UserRole>().expect("role"), UserRole::Admin);
        assert_eq!(
            "Direct_Member".parse::<UserRole>().expect("role"),
            UserRole::DirectMember
        );
        assert_eq!(
            "billing_manager".parse::<UserRole>().expect("role"),
            UserRole::BillingManager
        );
        assert_eq!("  ".parse::<UserRole>().expect("role"), UserRole::Unspecified);
        assert!(matches!(
            "owner".parse::<UserRole>(),
            Err(InputError::InvalidRole(r)) if r == "owner"
        ));
    }

    #[test]
    fn policy_config_uses_camel_case_keys() {
        let config: PolicyConfig = serde_json::from_value(json!({
            "emailDomainRule": { "regex": ".*@email.com$" },
            "trustedUserRule": { "regex": "^devops-bot$" }
        }))
        .expect("deserialize");
        assert_eq!(config.email_domain_rule.regex, ".*@email.com$");
        assert_eq!(
            config.trusted_user_rule.map(|r| r.regex).as_deref(),
            Some("^devops-bot$")
        );
    }

    #[test]
    fn trusted_user_rule_is_optional() {
        let config: PolicyConfig =
            serde_json::from_value(json!({ "emailDomainRule": { "regex": "x" } }))
                .expect("deserialize");
        assert!(config.trusted_user_rule.is_none());
    }

    #[test]
    fn issue_context_keeps_unknown_fields() {
        let issue: IssueContext = serde_json::from_value(json!({
            "number": 7,
            "html_url": "https://github.com/ActionsDesk/invite-user/issues/7",
            "user": { "login": "mona", "id": 1 }
        }))
        .expect("deserialize");
        assert_eq!(issue.number, 7);
        assert_eq!(issue.requester_login(), "mona");
        assert!(issue.extra.contains_key("html_url"));
        assert!(issue.user.extra.contains_key("id"));
    }

    #[test]
    fn invitation_tolerates_missing_fields() {
        let invitation: Invitation =
            serde_json::from_value(json!({ "id": 42, "email": "user@email.com" }))
                .expect("deserialize");
        assert_eq!(invitation.id, 42);
        assert!(invitation.created_at.is_none());

        let invitation: Invitation = serde_json::from_value(json!({
            "id": 3,
            "created_at": "2024-01-02T03:04:05Z"
        }))
        .expect("deserialize");
        assert_eq!(
            invitation.created_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-01-02T03:04:05+00:00")
        );
    }
}
