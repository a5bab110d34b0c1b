//! # commit-shame
//!
//! Git hooks that judge oversized diffs, lazy commit messages and giant
//! pushes, then tell you about it in the tone of your choosing.
//!
//! Each hook run walks the same pipeline:
//!
//! 1. [`config`] resolves defaults, `.commit-shame-config`, `.shamerc` and
//!    `COMMIT_SHAME_*` overrides into one `EffectiveConfig`
//! 2. [`metrics`] collects raw facts from git for the hook event
//! 3. [`rules`] and [`plugins`] each return a [`verdict::Verdict`]
//! 4. [`tone`] renders the headline in the configured insult pack
//! 5. [`hooks`] maps the aggregate verdict to git's exit code
//!
//! ## Quick Start
//!
//! ```bash
//! commit-shame init
//! echo "max_lines: 200" > .shamerc
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod metrics;
pub mod plugins;
pub mod rules;
pub mod tone;
pub mod verdict;

pub use config::EffectiveConfig;
pub use hooks::{HookEvent, HookInvocation, HookOrchestrator, HookOutcome};
pub use verdict::{Finding, Verdict, VerdictProvider};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
