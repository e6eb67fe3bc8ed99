//! Parsing of action inputs, repository context and the event payload.
//!
//! Values arrive here already read from the process environment; nothing in
//! this module touches `std::env`.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::InputError;
use crate::types::{ActionInputs, InvitationRequest, IssueContext, RepoRef, UserRole};

/// Raw, unvalidated action inputs.
#[derive(Debug, Clone, Default)]
pub struct RawInputs<'a> {
    pub email: Option<&'a str>,
    pub role: Option<&'a str>,
    pub config_path: Option<&'a str>,
    pub owners: Option<&'a str>,
}

impl ActionInputs {
    pub fn parse(raw: RawInputs<'_>) -> Result<Self, InputError> {
        let email = non_blank(raw.email).ok_or(InputError::EmailMissing)?;
        let config_path = non_blank(raw.config_path).ok_or(InputError::ConfigPathMissing)?;
        let role = parse_role(raw.role)?;
        let owners = parse_owners(raw.owners);

        Ok(Self {
            request: InvitationRequest {
                email: email.to_string(),
                role,
                owners,
            },
            config_path: config_path.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Unset or blank passes through as [`UserRole::Unspecified`].
pub fn parse_role(raw: Option<&str>) -> Result<UserRole, InputError> {
    raw.map_or(Ok(UserRole::Unspecified), str::parse::<UserRole>)
}

/// Comma-separated handles, trimmed and `@`-prefixed. Blank input yields no
/// owners rather than a lone `"@"`.
pub fn parse_owners(raw: Option<&str>) -> Vec<String> {
    match non_blank(raw) {
        None => Vec::new(),
        Some(list) => list
            .split(',')
            .map(|owner| format!("@{}", owner.trim()))
            .collect(),
    }
}

/// Parse the `owner/repo` context string.
pub fn parse_repo_context(raw: Option<&str>) -> Result<RepoRef, InputError> {
    non_blank(raw).ok_or(InputError::ContextMissing)?.parse()
}

/// Pull the `issue` object out of an event payload.
pub fn issue_from_payload(payload: &Value) -> Result<IssueContext, InputError> {
    let issue = payload
        .get("issue")
        .filter(|issue| !issue.is_null())
        .ok_or(InputError::IssueMissing)?;
    serde_json::from_value(issue.clone()).map_err(InputError::IssueMalformed)
}

/// Read the event payload file and extract its issue.
pub fn load_issue(event_path: Option<&Path>) -> Result<IssueContext, InputError> {
    let path = event_path.ok_or(InputError::EventPayloadMissing)?;
    let text = fs::read_to_string(path).map_err(|source| InputError::EventPayloadUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let payload: Value =
        serde_json::from_str(&text).map_err(|source| InputError::EventPayloadInvalid {
            path: path.to_path_buf(),
            source,
        })?;
    issue_from_payload(&payload)
}
