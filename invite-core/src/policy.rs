//! Email-domain and trusted-requester rules.
//!
//! Patterns are unanchored searches, as written in the policy document:
//! authors anchor with `^`/`$` where they need to. The dialect is the
//! `regex` crate's: lookaround and backreferences are not supported, and a
//! rule using them fails to compile.

use regex::{Regex, RegexBuilder};

use crate::error::{ConfigError, PolicyDenied};
use crate::types::{InvitationRequest, IssueContext, PolicyConfig};

/// Outcome of policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allowed,
    Denied(PolicyDenied),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allowed)
    }

    /// `Ok(())` when allowed, the denial otherwise.
    pub fn into_result(self) -> Result<(), PolicyDenied> {
        match self {
            PolicyDecision::Allowed => Ok(()),
            PolicyDecision::Denied(denied) => Err(denied),
        }
    }
}

/// `email` matches `pattern`, ignoring case.
pub fn valid_email(email: &str, pattern: &str) -> Result<bool, regex::Error> {
    Ok(email_regex(pattern)?.is_match(email))
}

/// `login` matches `pattern`, case-sensitively.
pub fn is_trusted_user(login: &str, pattern: &str) -> Result<bool, regex::Error> {
    Ok(Regex::new(pattern)?.is_match(login))
}

fn email_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A [`PolicyConfig`] with its patterns compiled.
#[derive(Debug, Clone)]
pub struct Policy {
    email_domain: Regex,
    trusted_user: Option<Regex>,
}

impl Policy {
    /// Compile both rules. A pattern that fails to compile is a config error.
    pub fn compile(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let email_domain =
            email_regex(&config.email_domain_rule.regex).map_err(|source| ConfigError::InvalidRule {
                rule: "emailDomainRule",
                pattern: config.email_domain_rule.regex.clone(),
                source,
            })?;

        let trusted_user = config
            .trusted_user_rule
            .as_ref()
            .map(|rule| {
                Regex::new(&rule.regex).map_err(|source| ConfigError::InvalidRule {
                    rule: "trustedUserRule",
                    pattern: rule.regex.clone(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            email_domain,
            trusted_user,
        })
    }

    /// Domain rule first, then the trust rule if configured. The first
    /// failing rule decides.
    pub fn evaluate(&self, request: &InvitationRequest, issue: &IssueContext) -> PolicyDecision {
        if !self.email_domain.is_match(&request.email) {
            return PolicyDecision::Denied(PolicyDenied::EmailDomain {
                email: request.email.clone(),
            });
        }

        if let Some(trusted) = &self.trusted_user {
            if !trusted.is_match(issue.requester_login()) {
                return PolicyDecision::Denied(PolicyDenied::UntrustedRequester {
                    login: issue.requester_login().to_string(),
                });
            }
        }

        PolicyDecision::Allowed
    }
}

/// Compile `config` and evaluate `request` against it in one step.
pub fn evaluate(
    request: &InvitationRequest,
    issue: &IssueContext,
    config: &PolicyConfig,
) -> Result<PolicyDecision, ConfigError> {
    Ok(Policy::compile(config)?.evaluate(request, issue))
}
