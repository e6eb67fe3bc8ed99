//! GitHubClient against a scripted local HTTP server.

use invite_core::{
    ApiError, ContentStore, CreateInvitation, Invitation, IssueTracker, OrgInvitations, RepoRef,
    UserRole,
};
use invite_github::GitHubClient;
use invite_testkit::{unreachable_url, ScriptedApi};

fn client(base: &str) -> GitHubClient {
    GitHubClient::new("test-token").with_api_url(base)
}

fn repo() -> RepoRef {
    RepoRef::new("ActionsDesk", "invite-user")
}

fn invite(role: UserRole) -> CreateInvitation {
    CreateInvitation {
        org: "ActionsDesk".into(),
        email: "user@email.com".into(),
        role,
    }
}

#[test]
fn file_content_returns_content_field() {
    let api = ScriptedApi::once(200, r#"{"type": "file", "content": "e30=\n"}"#);
    let content = client(&api.base_url)
        .file_content(&repo(), ".github/invite.json")
        .expect("contents");
    assert_eq!(content.as_deref(), Some("e30=\n"));

    let seen = api.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(
        seen[0].path,
        "/repos/ActionsDesk/invite-user/contents/.github/invite.json"
    );
    assert_eq!(seen[0].header("authorization"), Some("Bearer test-token"));
    assert_eq!(seen[0].header("accept"), Some("application/vnd.github+json"));
    assert_eq!(seen[0].header("x-github-api-version"), Some("2022-11-28"));
}

#[test]
fn directory_listing_has_no_content() {
    let api = ScriptedApi::once(200, r#"[{"type": "file", "name": "a.json"}]"#);
    let content = client(&api.base_url)
        .file_content(&repo(), ".github")
        .expect("contents");
    assert!(content.is_none());
}

#[test]
fn create_invitation_posts_email_and_role() {
    let api = ScriptedApi::once(
        201,
        r#"{"id": 42, "login": null, "email": "user@email.com", "created_at": "2024-01-02T03:04:05Z"}"#,
    );
    let invitation = client(&api.base_url)
        .create_invitation(&invite(UserRole::DirectMember))
        .expect("invite");
    assert_eq!(invitation.id, 42);
    assert_eq!(
        invitation.created_at.map(|t| t.to_rfc3339()).as_deref(),
        Some("2024-01-02T03:04:05+00:00")
    );

    let seen = api.seen();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/orgs/ActionsDesk/invitations");
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(
        body,
        serde_json::json!({ "email": "user@email.com", "role": "direct_member" })
    );
}

#[test]
fn created_invitation_without_timestamp_is_success() {
    let api = ScriptedApi::once(201, r#"{"id": 42, "email": "user@email.com"}"#);
    let invitation = client(&api.base_url)
        .create_invitation(&invite(UserRole::Unspecified))
        .expect("invite");
    assert_eq!(invitation.id, 42);
    assert!(invitation.created_at.is_none());
}

#[test]
fn created_invitation_with_unreadable_reply_is_success() {
    let api = ScriptedApi::once(201, "created");
    let invitation = client(&api.base_url)
        .create_invitation(&invite(UserRole::Admin))
        .expect("invite");
    assert_eq!(invitation, Invitation::default());
}

#[test]
fn rate_limited_invitation_is_classified() {
    let api = ScriptedApi::once(
        422,
        r#"{"message": "Validation Failed", "errors": [{"resource": "OrganizationInvitation", "code": "unprocessable", "field": "data", "message": "Over invitation rate limit"}]}"#,
    );
    let err = client(&api.base_url)
        .create_invitation(&invite(UserRole::Unspecified))
        .expect_err("rate limited");
    assert_eq!(err, ApiError::RateLimited);
}

#[test]
fn labels_and_comment_hit_issue_endpoints() {
    let api = ScriptedApi::start(vec![
        (200, r#"[{"name": "retry"}]"#.to_string()),
        (201, r#"{"id": 7}"#.to_string()),
    ]);
    let client = client(&api.base_url);
    client
        .add_labels(&repo(), 1, &["retry".to_string()])
        .expect("labels");
    client
        .create_comment(&repo(), 1, "hello")
        .expect("comment");

    let seen = api.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].path, "/repos/ActionsDesk/invite-user/issues/1/labels");
    assert_eq!(seen[0].body, r#"{"labels":["retry"]}"#);
    assert_eq!(seen[1].path, "/repos/ActionsDesk/invite-user/issues/1/comments");
    assert_eq!(seen[1].body, r#"{"body":"hello"}"#);
}

#[test]
fn unreachable_host_is_network_failure() {
    let err = client(&unreachable_url())
        .file_content(&repo(), "invite.json")
        .expect_err("refused");
    assert!(matches!(err, ApiError::NetworkFailure(_)));
}
