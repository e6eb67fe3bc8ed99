//! Shared fixtures: canned GitHub replies and an isolated workspace.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

pub use invite_testkit::{unreachable_url, ScriptedApi};

pub const POLICY_B64: &str = "eyJlbWFpbERvbWFpblJ1bGUiOnsicmVnZXgiOiIuKkBlbWFpbC5jb20kIn0sInRydXN0ZWRVc2VyUnVsZSI6eyJyZWdleCI6Il5kZXZvcHMtYm90JCJ9fQ==";

pub fn contents_response() -> (u16, String) {
    (200, format!(r#"{{"type": "file", "content": "{POLICY_B64}"}}"#))
}

pub fn invitation_response() -> (u16, String) {
    (
        201,
        r#"{"id": 1, "email": "user@email.com", "created_at": "2024-01-02T03:04:05Z"}"#.to_string(),
    )
}

pub fn invitation_error(message: &str) -> (u16, String) {
    (
        422,
        format!(
            r#"{{"message": "Validation Failed", "errors": [{{"resource": "OrganizationInvitation", "code": "unprocessable", "field": "data", "message": "{message}"}}]}}"#
        ),
    )
}

/// Temp dir holding the event payload and the step output file.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new(event: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("event.json"), event).expect("write event");
        Self { dir }
    }

    pub fn event_path(&self) -> PathBuf {
        self.dir.path().join("event.json")
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn outputs(&self) -> String {
        fs::read_to_string(self.output_path()).unwrap_or_default()
    }
}

pub const ISSUE_EVENT: &str = r#"{
    "action": "labeled",
    "issue": { "number": 1, "body": "Test", "user": { "login": "devops-bot" } }
}"#;

/// The binary with a clean environment and every input for a valid run.
pub fn invite_cmd(workspace: &Workspace, api_url: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("invite-user"));
    cmd.env_clear()
        .env("ADMIN_TOKEN", "not-a-token")
        .env("GITHUB_REPOSITORY", "ActionsDesk/invite-user")
        .env("GITHUB_EVENT_PATH", workspace.event_path())
        .env("GITHUB_OUTPUT", workspace.output_path())
        .env("GITHUB_API_URL", api_url)
        .env("INPUT_EMAIL", "user@email.com")
        .env("INPUT_USER_ROLE", "direct_member")
        .env("INPUT_CONFIG_PATH", "./.github/invite.json")
        .env("INPUT_OWNERS", "mona,hubot");
    cmd
}
