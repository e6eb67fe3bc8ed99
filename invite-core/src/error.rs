//! Error types for invite-core.
//!
//! Each stage raises its own enum; [`InviteError`] is what a run fails with.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Exact message the platform embeds when an org has hit its invitation quota.
pub const RATE_LIMIT_MESSAGE: &str = "Over invitation rate limit";

/// Missing or unusable process inputs. Raised before any network call.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("ADMIN_TOKEN not found.")]
    CredentialMissing,

    #[error("EMAIL input is required")]
    EmailMissing,

    #[error("CONFIG_PATH input is required")]
    ConfigPathMissing,

    #[error("unknown USER_ROLE '{0}'; expected: admin, direct_member, billing_manager")]
    InvalidRole(String),

    #[error("GITHUB_EVENT_PATH not set; no event payload to read")]
    EventPayloadMissing,

    #[error("failed to read event payload at {path}: {source}")]
    EventPayloadUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("event payload at {path} is not valid JSON: {source}")]
    EventPayloadInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No issue was found in the Action context.")]
    IssueMissing,

    /// The `issue` object lacks `number` or `user.login`.
    #[error("issue in the Action context is malformed: {0}")]
    IssueMalformed(#[source] serde_json::Error),

    #[error("There was an error getting the repository name from the Action context.")]
    ContextMissing,

    #[error("repository context '{0}' is not in owner/repo form")]
    ContextMalformed(String),
}

/// Failures loading the policy document. Terminal, no issue feedback.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to fetch config {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: ApiError,
    },

    /// The contents call answered without a `content` field (directory, submodule, ...).
    #[error("config {path} has no content")]
    NotFound { path: String },

    #[error("config {path} could not be decoded: {reason}")]
    Decode { path: String, reason: String },

    #[error("config {path} is malformed: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {rule} regex '{pattern}': {source}")]
    InvalidRule {
        rule: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A request rejected by policy. Terminal, no issue feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyDenied {
    #[error("Email {email} not from a valid domain")]
    EmailDomain { email: String },

    #[error("User that opened issue, {login} not a trusted user")]
    UntrustedRequester { login: String },
}

impl PolicyDenied {
    /// Short machine-stable reason, without the offending value.
    pub fn reason(&self) -> &'static str {
        match self {
            PolicyDenied::EmailDomain { .. } => "email not from a valid domain",
            PolicyDenied::UntrustedRequester { .. } => "requester not trusted",
        }
    }
}

/// One entry of the platform's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A failed platform call, reduced to the cases the workflow tells apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Over invitation rate limit")]
    RateLimited,

    #[error("{}", describe_failure(.status, .message, .errors))]
    OtherApiFailure {
        status: u16,
        message: String,
        errors: Vec<ApiErrorEntry>,
    },

    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl ApiError {
    /// Translate an HTTP error status and raw response body.
    ///
    /// The body is usually `{message, errors: [...], documentation_url}`;
    /// `errors` entries may be objects or bare strings. A rate-limit entry
    /// anywhere in `errors` classifies the whole response as
    /// [`ApiError::RateLimited`]. Non-JSON bodies keep their text as message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let Ok(payload) = serde_json::from_str::<Value>(body) else {
            let text = body.trim();
            return ApiError::OtherApiFailure {
                status,
                message: if text.is_empty() {
                    "empty response body".to_string()
                } else {
                    text.to_string()
                },
                errors: Vec::new(),
            };
        };

        let errors: Vec<ApiErrorEntry> = payload
            .get("errors")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(error_entry).collect())
            .unwrap_or_default();

        if errors
            .iter()
            .any(|e| e.message.as_deref() == Some(RATE_LIMIT_MESSAGE))
        {
            return ApiError::RateLimited;
        }

        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));

        ApiError::OtherApiFailure {
            status,
            message,
            errors,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited)
    }
}

fn error_entry(item: &Value) -> ApiErrorEntry {
    match item {
        Value::String(message) => ApiErrorEntry {
            message: Some(message.clone()),
            ..ApiErrorEntry::default()
        },
        other => serde_json::from_value(other.clone()).unwrap_or_default(),
    }
}

fn describe_failure(status: &u16, message: &str, errors: &[ApiErrorEntry]) -> String {
    let details: Vec<&str> = errors.iter().filter_map(|e| e.message.as_deref()).collect();
    if details.is_empty() {
        format!("{message} (HTTP {status})")
    } else {
        format!("{message} (HTTP {status}): {}", details.join("; "))
    }
}

/// Why a run ended in failed status.
#[derive(Debug, Error)]
pub enum InviteError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Denied(#[from] PolicyDenied),

    /// The invitation call itself failed; issue feedback has been written.
    #[error(transparent)]
    Invitation(ApiError),

    /// Writing the label or comment failed after a failed invitation.
    #[error("failed to write issue feedback: {0}")]
    Feedback(#[source] ApiError),
}

impl InviteError {
    /// Whether re-triggering the run later is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InviteError::Invitation(ApiError::RateLimited))
    }
}
