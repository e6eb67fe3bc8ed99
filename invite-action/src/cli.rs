//! Process inputs. Every value is read from the environment exactly once,
//! here, and handed down as plain data.

use std::path::PathBuf;

use clap::{builder::FalseyValueParser, Parser};

use invite_core::{
    error::InputError,
    inputs::{self, RawInputs},
    ActionInputs, RunContext,
};
use invite_github::{GitHubClient, DEFAULT_API_URL};

/// Invite the email requested in an issue into the repository owner's org.
///
/// Inputs use the `INPUT_*` variables the Actions runner sets; every one can
/// also be passed as a flag for local runs. Missing values are reported via
/// the step outputs, not as usage errors.
#[derive(Parser, Debug)]
#[command(name = "invite-user", version, long_about = None)]
pub struct Settings {
    /// Email address to invite.
    #[arg(long, env = "INPUT_EMAIL")]
    pub email: Option<String>,

    /// admin | direct_member | billing_manager. Unset lets GitHub decide.
    #[arg(long, env = "INPUT_USER_ROLE")]
    pub user_role: Option<String>,

    /// Repository-relative path of the policy JSON.
    #[arg(long, env = "INPUT_CONFIG_PATH")]
    pub config_path: Option<String>,

    /// Comma-separated handles to CC when automation fails.
    #[arg(long, env = "INPUT_OWNERS")]
    pub owners: Option<String>,

    /// Token with org admin rights.
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// `owner/repo` of the repository the workflow runs in.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// JSON payload of the triggering event.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File step outputs are appended to.
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Debug logging, as enabled by re-running a job with debug logs.
    #[arg(long, env = "RUNNER_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,
}

impl Settings {
    /// Validate preconditions in order: credential, inputs, issue payload,
    /// repository context. Nothing here touches the network.
    pub fn prepare(&self) -> Result<(GitHubClient, RunContext), InputError> {
        let token = self
            .admin_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(InputError::CredentialMissing)?;
        let client = GitHubClient::new(token).with_api_url(&self.api_url);

        let action_inputs = ActionInputs::parse(RawInputs {
            email: self.email.as_deref(),
            role: self.user_role.as_deref(),
            config_path: self.config_path.as_deref(),
            owners: self.owners.as_deref(),
        })?;
        let issue = inputs::load_issue(self.event_path.as_deref())?;
        let repo = inputs::parse_repo_context(self.repository.as_deref())?;

        tracing::debug!(
            repo = %repo,
            issue = issue.number,
            role = %action_inputs.request.role,
            "inputs parsed"
        );
        Ok((
            client,
            RunContext {
                repo,
                inputs: action_inputs,
                issue,
            },
        ))
    }
}
