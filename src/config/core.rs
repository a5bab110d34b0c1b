use figment::providers::{Env, Format, Serialized, Yaml};
use figment::value::Dict;
use figment::{Figment, Provider};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::{EffectiveConfig, ShameLevel, ShellConfig};
use crate::error::ConfigError;

/// Prefix of the environment overrides, e.g. `COMMIT_SHAME_MAX_LINES`
pub const ENV_PREFIX: &str = "COMMIT_SHAME_";

/// Shell-style `KEY=value` project file
pub const SHELL_CONFIG_FILE: &str = ".commit-shame-config";

/// Structured (YAML) project file
pub const YAML_CONFIG_FILE: &str = ".shamerc";

/// Merges defaults, project files and environment into an [`EffectiveConfig`].
pub struct ConfigResolver {
    figment: Figment,
    warnings: Vec<ConfigError>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PluginList {
    List(Vec<String>),
    Joined(String),
}

impl ConfigResolver {
    /// Resolve the configuration for `project_root`, logging every warning.
    pub fn resolve(project_root: &Path) -> EffectiveConfig {
        let (config, warnings) = Self::new(project_root).finish();
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        config
    }

    pub fn new(project_root: &Path) -> Self {
        tracing::trace!("CONFIG LOAD: Starting in {}", project_root.display());

        let mut resolver = Self {
            figment: Figment::from(Serialized::defaults(EffectiveConfig::default())),
            warnings: Vec::new(),
        };

        resolver.merge_file(project_root.join(SHELL_CONFIG_FILE), ShellConfig::file);
        resolver.merge_file(project_root.join(YAML_CONFIG_FILE), Yaml::file);
        resolver.figment = resolver.figment.clone().merge(Env::prefixed(ENV_PREFIX));

        resolver
    }

    /// A file layer is only merged when it parses as a whole, so one broken
    /// file cannot poison the keys coming from the other layers.
    fn merge_file<P, F>(&mut self, path: PathBuf, provider: F)
    where
        P: Provider,
        F: FnOnce(PathBuf) -> P,
    {
        let layer = Figment::from(provider(path.clone()));
        match layer.extract::<Dict>() {
            Ok(dict) => {
                if !dict.is_empty() {
                    tracing::debug!("CONFIG LOAD: Merging {}", path.display());
                }
                self.figment = self.figment.clone().merge(layer);
            }
            Err(e) => self.warnings.push(ConfigError::Malformed {
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Type-check every known key and build the final value.
    pub fn finish(mut self) -> (EffectiveConfig, Vec<ConfigError>) {
        let defaults = EffectiveConfig::default();

        let mut min_lines = self.field("min_lines", defaults.min_lines);
        let mut max_lines = self.field("max_lines", defaults.max_lines);
        if min_lines > max_lines {
            self.warnings.push(ConfigError::InvalidValue {
                key: "min_lines",
                reason: format!("min_lines ({min_lines}) exceeds max_lines ({max_lines})"),
            });
            min_lines = defaults.min_lines;
            max_lines = defaults.max_lines;
        }

        let insult_pack = self.field("insult_pack", defaults.insult_pack.clone());
        let insult_pack = match insult_pack.trim().to_ascii_lowercase() {
            name if name.is_empty() => {
                self.invalid("insult_pack", "pack name is empty");
                defaults.insult_pack.clone()
            }
            name => name,
        };

        let shame_level = self.field("shame_level", defaults.shame_level.to_string());
        let shame_level = match shame_level.parse::<ShameLevel>() {
            Ok(level) => level,
            Err(reason) => {
                self.invalid("shame_level", reason);
                defaults.shame_level
            }
        };

        let plugins = match self.field("plugins", PluginList::List(Vec::new())) {
            PluginList::List(names) => names,
            PluginList::Joined(joined) => joined
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::to_string)
                .collect(),
        };
        let plugins = plugins
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let config = EffectiveConfig {
            min_lines,
            max_lines,
            insult_pack,
            shame_level,
            plugins,
            block_on_severe: self.field("block_on_severe", defaults.block_on_severe),
            max_commits: self.field("max_commits", defaults.max_commits),
            body_required_lines: self.field("body_required_lines", defaults.body_required_lines),
            plugin_timeout_secs: self.field("plugin_timeout_secs", defaults.plugin_timeout_secs),
            plugins_dir: self.field("plugins_dir", defaults.plugins_dir.clone()),
        };

        tracing::trace!("CONFIG LOAD: Final {:?}", config);
        (config, self.warnings)
    }

    fn field<T: DeserializeOwned>(&mut self, key: &'static str, default: T) -> T {
        let Ok(value) = self.figment.find_value(key) else {
            return default;
        };
        match value.deserialize::<T>() {
            Ok(parsed) => parsed,
            Err(e) => {
                self.invalid(key, e.to_string());
                default
            }
        }
    }

    fn invalid(&mut self, key: &'static str, reason: impl Into<String>) {
        self.warnings.push(ConfigError::InvalidValue {
            key,
            reason: reason.into(),
        });
    }
}
