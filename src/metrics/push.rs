use git2::Oid;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::EnvironmentError;
use crate::git::GitRepo;
use crate::hooks::RefUpdate;

/// Size of everything about to be pushed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PushMetrics {
    pub commit_count: u64,
    pub total_lines_changed: u64,
}

impl PushMetrics {
    /// Aggregate over every commit in every pushed range. A commit reachable
    /// from several updated refs is counted once.
    pub fn collect(git: &GitRepo, updates: &[RefUpdate]) -> Result<Self, EnvironmentError> {
        let mut seen: HashSet<Oid> = HashSet::new();
        let mut metrics = PushMetrics::default();

        for update in updates.iter().filter(|u| !u.is_delete()) {
            let base = (!update.is_new_branch()).then_some(update.remote_oid);
            let commits = git.commits_between(update.local_oid, base)?;
            tracing::debug!(
                local_ref = %update.local_ref,
                commits = commits.len(),
                "Walking pushed range"
            );

            for oid in commits {
                if !seen.insert(oid) {
                    continue;
                }
                metrics.commit_count += 1;
                metrics.total_lines_changed += git.commit_diff(oid)?.lines();
            }
        }

        Ok(metrics)
    }
}
