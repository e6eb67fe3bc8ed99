use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};

use invite_core::{
    ApiError, ContentStore, CreateInvitation, Invitation, IssueTracker, OrgInvitations, RepoRef,
};

use crate::error::{api_error, body_err};

/// Public GitHub API; GitHub Enterprise Server passes its own via `GITHUB_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Token-authenticated GitHub REST client.
#[derive(Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .user_agent(concat!("invite-user/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at another API root. A trailing `/` is ignored.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = self.url(path);
        tracing::debug!(method, url = %url, "github request");
        self.agent
            .request(method, &url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
    }

    fn post(&self, path: &str, body: impl Serialize) -> Result<ureq::Response, ApiError> {
        self.request("POST", path).send_json(body).map_err(api_error)
    }
}

impl ContentStore for GitHubClient {
    fn file_content(&self, repo: &RepoRef, path: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .request("GET", &contents_path(repo, path))
            .call()
            .map_err(api_error)?;
        let payload: Value = response.into_json().map_err(body_err)?;
        Ok(payload
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

impl OrgInvitations for GitHubClient {
    fn create_invitation(&self, invite: &CreateInvitation) -> Result<Invitation, ApiError> {
        let path = format!("/orgs/{}/invitations", urlencoding::encode(&invite.org));
        let response = self.post(&path, invite)?;
        Ok(created_invitation(response))
    }
}

impl IssueTracker for GitHubClient {
    fn add_labels(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        labels: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("{}/labels", issue_path(repo, issue_number));
        self.post(&path, json!({ "labels": labels }))?;
        Ok(())
    }

    fn create_comment(&self, repo: &RepoRef, issue_number: u64, body: &str) -> Result<(), ApiError> {
        let path = format!("{}/comments", issue_path(repo, issue_number));
        self.post(&path, json!({ "body": body }))?;
        Ok(())
    }
}

/// The invitation exists once the POST succeeds; an unreadable reply only
/// loses the informational fields.
fn created_invitation(response: ureq::Response) -> Invitation {
    let parsed = response
        .into_string()
        .map_err(|err| err.to_string())
        .and_then(|body| {
            serde_json::from_str::<Invitation>(&body).map_err(|err| err.to_string())
        });
    match parsed {
        Ok(invitation) => invitation,
        Err(err) => {
            tracing::warn!(error = %err, "invitation created but its reply could not be decoded");
            Invitation::default()
        }
    }
}

fn repo_path(repo: &RepoRef) -> String {
    format!(
        "/repos/{}/{}",
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.repo)
    )
}

fn issue_path(repo: &RepoRef, issue_number: u64) -> String {
    format!("{}/issues/{issue_number}", repo_path(repo))
}

fn contents_path(repo: &RepoRef, path: &str) -> String {
    let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
    format!("{}/contents/{}", repo_path(repo), encoded.join("/"))
}
