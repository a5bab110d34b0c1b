//! Configuration management for commit-shame
//!
//! The effective configuration is assembled once per hook run from three
//! layers, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. Project files: `.commit-shame-config` (shell style) then `.shamerc` (YAML)
//! 3. `COMMIT_SHAME_*` environment variables
//!
//! Resolution never fails. Broken files and invalid values are reported as
//! warnings and fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

mod core;
mod formats;
mod shell;

pub use self::core::{ConfigResolver, ENV_PREFIX, SHELL_CONFIG_FILE, YAML_CONFIG_FILE};
pub use formats::ConfigFormat;
pub use shell::ShellConfig;

/// How hard the rendered messages hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShameLevel {
    Gentle,
    #[default]
    Sarcastic,
    Savage,
}

impl ShameLevel {
    pub const ALL: [ShameLevel; 3] = [ShameLevel::Gentle, ShameLevel::Sarcastic, ShameLevel::Savage];

    pub fn as_str(self) -> &'static str {
        match self {
            ShameLevel::Gentle => "gentle",
            ShameLevel::Sarcastic => "sarcastic",
            ShameLevel::Savage => "savage",
        }
    }
}

impl fmt::Display for ShameLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShameLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gentle" => Ok(ShameLevel::Gentle),
            "sarcastic" => Ok(ShameLevel::Sarcastic),
            "savage" => Ok(ShameLevel::Savage),
            other => Err(format!(
                "`{other}` is not one of gentle, sarcastic, savage"
            )),
        }
    }
}

/// The configuration every component reads. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    /// Staged diffs smaller than this are lazy commits.
    pub min_lines: u64,

    /// Staged diffs larger than this are blocked.
    pub max_lines: u64,

    /// Name of the tone pack used for rendering
    pub insult_pack: String,

    pub shame_level: ShameLevel,

    /// Plugin allow-list, matched against file stems in `plugins_dir`
    pub plugins: BTreeSet<String>,

    /// Exit 1 on a Block verdict. When false, blocking is advisory only.
    pub block_on_severe: bool,

    /// Pushes with more commits than this get a warning.
    pub max_commits: u64,

    /// Commit messages without a body warn once the staged diff exceeds this.
    pub body_required_lines: u64,

    pub plugin_timeout_secs: u64,

    /// Plugins directory, relative to the project root unless absolute
    pub plugins_dir: PathBuf,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            min_lines: 1,
            max_lines: 500,
            insult_pack: "neutral".to_string(),
            shame_level: ShameLevel::default(),
            plugins: BTreeSet::new(),
            block_on_severe: true,
            max_commits: 10,
            body_required_lines: 100,
            plugin_timeout_secs: 5,
            plugins_dir: PathBuf::from("hooks.d"),
        }
    }
}

impl EffectiveConfig {
    pub fn plugin_timeout(&self) -> Duration {
        Duration::from_secs(self.plugin_timeout_secs)
    }
}

#[cfg(test)]
mod tests;
