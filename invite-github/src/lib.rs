//! # invite-github
//!
//! Blocking GitHub REST client for the invitation workflow.
//!
//! [`GitHubClient`] implements the platform traits from `invite-core`
//! (contents, org invitations, issue labels and comments). Failed calls are
//! translated into [`invite_core::ApiError`] by [`api_error`].

mod client;
mod error;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use error::api_error;
