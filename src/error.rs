//! Error taxonomy for the hook engine
//!
//! Only [`EnvironmentError`] is fatal. The other kinds are recovered where they
//! occur and surface as warnings.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Problems with a project config file or one of its values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} could not be parsed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("invalid value for `{key}`: {reason}; using default")]
    InvalidValue { key: &'static str, reason: String },
}

/// The git state could not be read. Aborts the run with exit code 1.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("not inside a git repository")]
    NotARepository(#[source] git2::Error),

    #[error("unable to read {what}")]
    Git {
        what: String,
        #[source]
        source: git2::Error,
    },

    #[error("unable to read commit message file {path}")]
    MessageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pre-push ref line: {0:?}")]
    RefLine(String),
}

impl EnvironmentError {
    pub(crate) fn git(what: impl Into<String>, source: git2::Error) -> Self {
        Self::Git {
            what: what.into(),
            source,
        }
    }
}

/// A plugin misbehaved. Always treated as a Pass verdict.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin `{name}` failed to start: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("plugin `{name}` input could not be encoded: {source}")]
    Payload {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("plugin `{name}` timed out after {budget:?}")]
    Timeout { name: String, budget: Duration },

    #[error("plugin `{name}` exited with {status}")]
    Exit { name: String, status: String },

    #[error("plugin `{name}` produced an unparsable response: {output:?}")]
    BadOutput { name: String, output: String },
}

/// A message could not be rendered exactly as requested.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown insult pack `{0}`, falling back to neutral")]
    UnknownPack(String),

    #[error("no template for `{0}`, using generic text")]
    UnknownKey(String),
}
