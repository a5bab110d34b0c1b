//! Metric collectors
//!
//! Raw facts about the current hook event, gathered fresh from git on every
//! run. Collection failures are fatal: a verdict computed from half-read git
//! state would be worse than no verdict.

use serde::Serialize;

use crate::error::EnvironmentError;
use crate::git::GitRepo;
use crate::hooks::{HookEvent, HookInvocation};

mod message;
mod push;

pub use message::{MessageMetrics, clean_message};
pub use push::PushMetrics;

/// Size of the staged diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffMetrics {
    pub lines_added: u64,
    pub lines_removed: u64,
    pub files_changed: u64,
}

impl DiffMetrics {
    pub fn lines_changed(&self) -> u64 {
        self.lines_added + self.lines_removed
    }
}

/// Everything the rules and plugins get to see, keyed by event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Metrics {
    PreCommit(DiffMetrics),
    CommitMsg(MessageMetrics),
    PrePush(PushMetrics),
}

impl Metrics {
    pub fn event(&self) -> HookEvent {
        match self {
            Metrics::PreCommit(_) => HookEvent::PreCommit,
            Metrics::CommitMsg(_) => HookEvent::CommitMsg,
            Metrics::PrePush(_) => HookEvent::PrePush,
        }
    }
}

/// Collect the metrics for `invocation` from the repository state right now
pub fn collect(invocation: &HookInvocation, git: &GitRepo) -> Result<Metrics, EnvironmentError> {
    let metrics = match invocation {
        HookInvocation::PreCommit => {
            let stat = git.staged_diff()?;
            Metrics::PreCommit(DiffMetrics {
                lines_added: stat.insertions,
                lines_removed: stat.deletions,
                files_changed: stat.files_changed,
            })
        }
        HookInvocation::CommitMsg { message_file } => {
            let raw = std::fs::read_to_string(message_file).map_err(|source| {
                EnvironmentError::MessageFile {
                    path: message_file.clone(),
                    source,
                }
            })?;
            let staged_lines = git.staged_diff()?.lines();
            Metrics::CommitMsg(MessageMetrics::from_message(&raw, staged_lines))
        }
        HookInvocation::PrePush { updates, .. } => Metrics::PrePush(PushMetrics::collect(git, updates)?),
    };

    tracing::debug!(event = %invocation.event(), ?metrics, "Metrics collected");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::TestRepo;

    #[test]
    fn test_collect_pre_commit() {
        let fixture = TestRepo::new();
        fixture.stage("a.txt", "1\n2\n3\n");
        fixture.stage("b.txt", "x\n");

        let metrics = collect(&HookInvocation::PreCommit, &fixture.git()).unwrap();
        assert_eq!(
            metrics,
            Metrics::PreCommit(DiffMetrics {
                lines_added: 4,
                lines_removed: 0,
                files_changed: 2,
            })
        );
    }

    #[test]
    fn test_collect_commit_msg_reads_file() {
        let fixture = TestRepo::new();
        fixture.stage("a.txt", &"line\n".repeat(7));
        fixture.write("MSG", "Add parser\n\nExplains the parser.\n# comment\n");

        let invocation = HookInvocation::CommitMsg {
            message_file: fixture.path().join("MSG"),
        };
        let Metrics::CommitMsg(message) = collect(&invocation, &fixture.git()).unwrap() else {
            panic!("expected commit-msg metrics");
        };
        assert_eq!(message.subject_length, 10);
        assert!(message.has_body);
        assert_eq!(message.staged_lines, 7);
    }

    #[test]
    fn test_missing_message_file_is_fatal() {
        let fixture = TestRepo::new();
        let invocation = HookInvocation::CommitMsg {
            message_file: fixture.path().join("does-not-exist"),
        };
        let err = collect(&invocation, &fixture.git()).unwrap_err();
        assert!(matches!(err, EnvironmentError::MessageFile { .. }));
    }
}
