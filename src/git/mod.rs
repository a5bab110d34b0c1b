//! Git integration layer for commit-shame
//!
//! Thin wrapper over `git2` for the read-only queries the metric collectors
//! need, plus hook shim installation for `commit-shame init`.

use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

use crate::error::EnvironmentError;

mod operations;
#[cfg(test)]
pub(crate) mod test_support;

pub use operations::DiffStat;

/// Marker line identifying hook shims written by `commit-shame init`
pub const SHIM_MARKER: &str = "# installed by commit-shame";

pub struct GitRepo {
    repo: Repository,
}

/// What happened to one hook file during installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookInstall {
    Installed,
    Replaced,
    /// A foreign hook already exists and `force` was not given
    Skipped,
}

impl GitRepo {
    /// Discover the repository containing `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self, EnvironmentError> {
        let repo = Repository::discover(path).map_err(EnvironmentError::NotARepository)?;
        Ok(Self { repo })
    }

    /// Working tree root, or the git dir for bare repositories
    pub fn root(&self) -> PathBuf {
        self.repo
            .workdir()
            .unwrap_or_else(|| self.repo.path())
            .to_path_buf()
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.repo.path().join("hooks")
    }

    /// Write an executable hook script, leaving foreign hooks alone unless `force`
    pub fn install_hook(&self, hook_name: &str, hook_content: &str, force: bool) -> Result<HookInstall> {
        let hooks_dir = self.hooks_dir();
        let hook_path = hooks_dir.join(hook_name);

        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;

        let status = match std::fs::read_to_string(&hook_path) {
            Ok(existing) if existing.contains(SHIM_MARKER) || force => HookInstall::Replaced,
            Ok(_) => return Ok(HookInstall::Skipped),
            Err(_) => HookInstall::Installed,
        };

        std::fs::write(&hook_path, hook_content)
            .with_context(|| format!("Failed to write hook file {}", hook_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        Ok(status)
    }
}
