use git2::{Diff, ErrorCode, Index, Oid, Sort};
use std::path::Path;

use super::GitRepo;
use crate::error::EnvironmentError;

/// Line and file counts of one diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStat {
    pub insertions: u64,
    pub deletions: u64,
    pub files_changed: u64,
}

impl DiffStat {
    pub fn lines(&self) -> u64 {
        self.insertions + self.deletions
    }
}

impl GitRepo {
    /// Diff between HEAD and the index, i.e. exactly what the next commit
    /// will contain. An unborn branch diffs against the empty tree.
    ///
    /// `git commit -a`, `git commit <paths>` and `--only` build a temporary
    /// index and export it to hooks as `GIT_INDEX_FILE`; that file wins over
    /// `.git/index` when set.
    pub fn staged_diff(&self) -> Result<DiffStat, EnvironmentError> {
        let index_file = std::env::var_os("GIT_INDEX_FILE").filter(|v| !v.is_empty());
        self.staged_diff_against(index_file.as_deref().map(Path::new))
    }

    /// Like [`staged_diff`](Self::staged_diff), reading `index_file` instead
    /// of the repository index. A relative path is taken from the working
    /// tree root.
    pub fn staged_diff_against(&self, index_file: Option<&Path>) -> Result<DiffStat, EnvironmentError> {
        let head_tree = match self.repo.head() {
            Ok(head) => Some(
                head.peel_to_tree()
                    .map_err(|e| EnvironmentError::git("HEAD tree", e))?,
            ),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(EnvironmentError::git("HEAD", e)),
        };

        let index = match index_file {
            Some(path) => {
                let path = self.root().join(path);
                let what = format!("index {}", path.display());
                // libgit2 opens a missing index file as an empty one
                if !path.is_file() {
                    return Err(EnvironmentError::git(what, git2::Error::from_str("no such file")));
                }
                tracing::debug!("Reading staged changes from {}", path.display());
                Index::open(&path).map_err(|e| EnvironmentError::git(what, e))?
            }
            None => self
                .repo
                .index()
                .map_err(|e| EnvironmentError::git("index", e))?,
        };
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .map_err(|e| EnvironmentError::git("staged diff", e))?;

        diff_stat(&diff, "staged diff")
    }

    /// Diff a commit against its first parent (the empty tree for root commits)
    pub fn commit_diff(&self, oid: Oid) -> Result<DiffStat, EnvironmentError> {
        let what = format!("commit {oid}");
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| EnvironmentError::git(what.clone(), e))?;
        let tree = commit
            .tree()
            .map_err(|e| EnvironmentError::git(what.clone(), e))?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(
                commit
                    .parent(0)
                    .and_then(|parent| parent.tree())
                    .map_err(|e| EnvironmentError::git(format!("parent of {oid}"), e))?,
            ),
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(|e| EnvironmentError::git(what.clone(), e))?;

        diff_stat(&diff, &what)
    }

    /// Commits reachable from `tip` but not from `base`. Without a base the
    /// walk runs to the repository root.
    pub fn commits_between(&self, tip: Oid, base: Option<Oid>) -> Result<Vec<Oid>, EnvironmentError> {
        let range = match base {
            Some(base) => format!("{base}..{tip}"),
            None => tip.to_string(),
        };
        let walk_err = |e| EnvironmentError::git(format!("commit range {range}"), e);

        let mut walk = self.repo.revwalk().map_err(walk_err)?;
        walk.set_sorting(Sort::TOPOLOGICAL).map_err(walk_err)?;
        walk.push(tip).map_err(walk_err)?;
        if let Some(base) = base {
            // The remote tip must exist locally, or the range is unknowable.
            self.repo.find_commit(base).map_err(walk_err)?;
            walk.hide(base).map_err(walk_err)?;
        }

        walk.collect::<Result<Vec<_>, _>>().map_err(walk_err)
    }
}

fn diff_stat(diff: &Diff<'_>, what: &str) -> Result<DiffStat, EnvironmentError> {
    let stats = diff
        .stats()
        .map_err(|e| EnvironmentError::git(what.to_string(), e))?;

    Ok(DiffStat {
        insertions: stats.insertions() as u64,
        deletions: stats.deletions() as u64,
        files_changed: stats.files_changed() as u64,
    })
}
