//! Fetch and decode the policy document.
//!
//! The contents API serves files base64-encoded, wrapped at 60 columns.
//! Decoding is a pure function of the raw `content` field so the same input
//! always yields the same [`PolicyConfig`].

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::ConfigError;
use crate::platform::ContentStore;
use crate::types::{PolicyConfig, RepoRef};

/// Strip leading `./` and `/` so workflow-style paths hit the contents API.
pub fn normalize_path(path: &str) -> &str {
    let mut path = path.trim();
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            return path;
        }
    }
}

/// Decode the raw `content` field served for `path`.
pub fn decode(path: &str, content: Option<&str>) -> Result<PolicyConfig, ConfigError> {
    let content = content.ok_or_else(|| ConfigError::NotFound {
        path: path.to_string(),
    })?;

    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| ConfigError::Decode {
            path: path.to_string(),
            reason: err.to_string(),
        })?;
    let text = String::from_utf8(bytes).map_err(|err| ConfigError::Decode {
        path: path.to_string(),
        reason: err.to_string(),
    })?;

    tracing::debug!(path, content = %text, "decoded policy document");

    serde_json::from_str(&text).map_err(|source| ConfigError::Malformed {
        path: path.to_string(),
        source,
    })
}

/// One read against the content store, then [`decode`]. No retry.
pub fn fetch<S: ContentStore + ?Sized>(
    store: &S,
    repo: &RepoRef,
    path: &str,
) -> Result<PolicyConfig, ConfigError> {
    let path = normalize_path(path);
    let content = store
        .file_content(repo, path)
        .map_err(|source| ConfigError::Fetch {
            path: path.to_string(),
            source,
        })?;
    decode(path, content.as_deref())
}
