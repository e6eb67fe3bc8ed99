//! Seams to the hosting platform.
//!
//! The pipeline only ever talks to the platform through these traits. The
//! GitHub REST client implements all three; tests use in-memory fakes.

use serde::Serialize;

use crate::error::ApiError;
use crate::types::{Invitation, RepoRef, UserRole};

/// Read access to repository file contents.
pub trait ContentStore {
    /// Raw `content` field for `path` in `repo`, base64-encoded as the
    /// platform serves it. `Ok(None)` when the response carries no content.
    fn file_content(&self, repo: &RepoRef, path: &str) -> Result<Option<String>, ApiError>;
}

/// Body of a create-invitation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateInvitation {
    #[serde(skip)]
    pub org: String,
    pub email: String,
    #[serde(skip_serializing_if = "UserRole::is_unspecified")]
    pub role: UserRole,
}

/// The privileged org-invitation endpoint.
pub trait OrgInvitations {
    fn create_invitation(&self, invite: &CreateInvitation) -> Result<Invitation, ApiError>;
}

/// Write access to issue labels and comments.
pub trait IssueTracker {
    fn add_labels(&self, repo: &RepoRef, issue_number: u64, labels: &[String])
        -> Result<(), ApiError>;

    fn create_comment(&self, repo: &RepoRef, issue_number: u64, body: &str)
        -> Result<(), ApiError>;
}

/// Everything a full run needs.
pub trait Platform: ContentStore + OrgInvitations + IssueTracker {}

impl<T: ContentStore + OrgInvitations + IssueTracker> Platform for T {}
