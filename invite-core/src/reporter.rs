//! Label + comment feedback on the originating issue.

use crate::error::ApiError;
use crate::platform::IssueTracker;
use crate::types::{IssueFeedback, RepoRef, AUTOMATION_FAILED_LABEL, RETRY_LABEL};

impl IssueFeedback {
    /// Rate-limited: label for an overnight re-trigger.
    pub fn retry(repo: &RepoRef, issue_number: u64) -> Self {
        Self {
            repo: repo.clone(),
            issue_number,
            labels: vec![RETRY_LABEL.to_string()],
            body: "Over invitation rate limit. Retrying over-night".to_string(),
        }
    }

    /// Anything else: hand over to the org admins listed in `owners`.
    pub fn automation_failed(repo: &RepoRef, issue_number: u64, owners: &[String]) -> Self {
        Self {
            repo: repo.clone(),
            issue_number,
            labels: vec![AUTOMATION_FAILED_LABEL.to_string()],
            body: format!(
                "Automation Failed:\n\
                 Org Admins will review the request and action it manually.\n\
                 CC: {}",
                owners.join(",")
            ),
        }
    }
}

/// Apply the labels, then post the comment. Either failure propagates as is;
/// a failed label write means no comment is posted.
pub fn report<T: IssueTracker + ?Sized>(
    tracker: &T,
    feedback: &IssueFeedback,
) -> Result<(), ApiError> {
    tracing::debug!(
        repo = %feedback.repo,
        issue = feedback.issue_number,
        labels = ?feedback.labels,
        "writing issue feedback"
    );
    tracker.add_labels(&feedback.repo, feedback.issue_number, &feedback.labels)?;
    tracker.create_comment(&feedback.repo, feedback.issue_number, &feedback.body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Tracker {
        fail_labels: bool,
        calls: RefCell<Vec<String>>,
    }

    impl IssueTracker for Tracker {
        fn add_labels(
            &self,
            _repo: &RepoRef,
            issue_number: u64,
            labels: &[String],
        ) -> Result<(), ApiError> {
            self.calls
                .borrow_mut()
                .push(format!("labels #{issue_number} {}", labels.join(",")));
            if self.fail_labels {
                return Err(ApiError::NetworkFailure("connection reset".into()));
            }
            Ok(())
        }

        fn create_comment(
            &self,
            _repo: &RepoRef,
            issue_number: u64,
            _body: &str,
        ) -> Result<(), ApiError> {
            self.calls
                .borrow_mut()
                .push(format!("comment #{issue_number}"));
            Ok(())
        }
    }

    fn repo() -> RepoRef {
        RepoRef::new("ActionsDesk", "invite-user")
    }

    #[test]
    fn labels_then_comment() {
        let tracker = Tracker::default();
        report(&tracker, &IssueFeedback::retry(&repo(), 3)).expect("report");
        assert_eq!(
            *tracker.calls.borrow(),
            vec!["labels #3 retry".to_string(), "comment #3".to_string()]
        );
    }

    #[test]
    fn label_failure_propagates_and_skips_comment() {
        let tracker = Tracker {
            fail_labels: true,
            ..Tracker::default()
        };
        let err = report(&tracker, &IssueFeedback::retry(&repo(), 3)).expect_err("fail");
        assert!(matches!(err, ApiError::NetworkFailure(_)));
        assert_eq!(tracker.calls.borrow().len(), 1);
    }

    #[test]
    fn automation_failed_body_ccs_owners() {
        let feedback = IssueFeedback::automation_failed(
            &repo(),
            1,
            &["@mona".to_string(), "@hubot".to_string()],
        );
        assert_eq!(feedback.labels, vec!["automation-failed"]);
        assert_eq!(
            feedback.body,
            "Automation Failed:\nOrg Admins will review the request and action it manually.\nCC: @mona,@hubot"
        );
    }

    #[test]
    fn automation_failed_without_owners() {
        let feedback = IssueFeedback::automation_failed(&repo(), 1, &[]);
        assert!(feedback.body.ends_with("CC: "));
    }
}
