//! Git hook entry points
//!
//! Git runs one of three hooks, each of which lands in the
//! [`HookOrchestrator`]:
//!
//! - `pre-commit` - judges the staged diff size
//! - `commit-msg` - judges the commit message, read from the file git passes
//! - `pre-push` - judges the commits about to be pushed, read from the ref
//!   update lines git writes to stdin
//!
//! The shims `commit-shame init` installs are plain shell scripts:
//!
//! ```sh
//! #!/bin/sh
//! # installed by commit-shame
//! exec commit-shame hook pre-commit "$@"
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

mod orchestrator;
mod pre_push;

pub use orchestrator::{HookOrchestrator, HookOutcome, RenderedMessage, Stage};
pub use pre_push::{RefUpdate, read_ref_updates};

/// The lifecycle point git invoked us at. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    PreCommit,
    CommitMsg,
    PrePush,
}

impl HookEvent {
    pub const ALL: [HookEvent; 3] = [HookEvent::PreCommit, HookEvent::CommitMsg, HookEvent::PrePush];

    /// File name of the hook inside `<git-dir>/hooks`
    pub fn hook_name(self) -> &'static str {
        match self {
            HookEvent::PreCommit => "pre-commit",
            HookEvent::CommitMsg => "commit-msg",
            HookEvent::PrePush => "pre-push",
        }
    }

    /// Script installed at `<git-dir>/hooks/<hook_name>`
    pub fn shim(self) -> String {
        format!(
            "#!/bin/sh\n{}\nexec commit-shame hook {} \"$@\"\n",
            crate::git::SHIM_MARKER,
            self.hook_name()
        )
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hook_name())
    }
}

/// A hook event together with the arguments git handed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookInvocation {
    PreCommit,
    CommitMsg {
        message_file: PathBuf,
    },
    PrePush {
        remote: String,
        url: Option<String>,
        updates: Vec<RefUpdate>,
    },
}

impl HookInvocation {
    pub fn event(&self) -> HookEvent {
        match self {
            HookInvocation::PreCommit => HookEvent::PreCommit,
            HookInvocation::CommitMsg { .. } => HookEvent::CommitMsg,
            HookInvocation::PrePush { .. } => HookEvent::PrePush,
        }
    }
}
