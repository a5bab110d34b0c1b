//! Plugin dispatcher
//!
//! Plugins are executables in the project's `plugins_dir` (default
//! `hooks.d/`) whose file stem appears in the `plugins` allow-list. Each one
//! runs as a [`SubprocessPlugin`] and contributes one finding. Plugins run
//! concurrently, bounded by the CPU count, and their findings come back in
//! file-name order regardless of which finished first.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::EffectiveConfig;
use crate::metrics::Metrics;
use crate::verdict::{Finding, Verdict, VerdictProvider};

mod subprocess;
#[cfg(all(test, unix))]
pub(crate) mod test_support;

pub use subprocess::{PluginPayload, SubprocessPlugin, parse_response};

/// Slack on top of a plugin's own budget before the dispatcher gives up on it
const KILL_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct PluginDispatcher {
    plugins: Vec<Arc<SubprocessPlugin>>,
    max_parallel: usize,
}

impl PluginDispatcher {
    /// Find allow-listed executables under `plugins_dir`, resolved against
    /// the project root.
    pub fn discover(root: &Path, config: &EffectiveConfig) -> Self {
        let max_parallel = num_cpus::get().max(1);
        if config.plugins.is_empty() {
            return Self {
                plugins: Vec::new(),
                max_parallel,
            };
        }

        let dir = root.join(&config.plugins_dir);
        let mut found: Vec<(String, PathBuf)> = match std::fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| is_executable(path))
                .filter_map(|path| {
                    let stem = path.file_stem()?.to_str()?.to_string();
                    config.plugins.contains(&stem).then_some((stem, path))
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Cannot read plugin directory {}: {e}", dir.display());
                Vec::new()
            }
        };
        found.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));

        // One executable per allow-list entry: the first by file name
        let mut seen = BTreeSet::new();
        found.retain(|(stem, path)| {
            if seen.insert(stem.clone()) {
                return true;
            }
            tracing::warn!(
                "Plugin `{stem}` has several executables; ignoring {}",
                path.display()
            );
            false
        });

        for name in &config.plugins {
            if !found.iter().any(|(stem, _)| stem == name) {
                tracing::warn!(
                    "Plugin `{name}` is enabled but no executable was found in {}",
                    dir.display()
                );
            }
        }

        let plugins = found
            .into_iter()
            .map(|(name, path)| Arc::new(SubprocessPlugin::new(name, path, root, config.plugin_timeout())))
            .collect::<Vec<_>>();
        tracing::debug!(count = plugins.len(), "Plugins discovered");

        Self {
            plugins,
            max_parallel,
        }
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn plugins(&self) -> impl Iterator<Item = &SubprocessPlugin> {
        self.plugins.iter().map(Arc::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin and return one finding each, in discovery order
    pub async fn dispatch(&self, metrics: &Metrics, config: &EffectiveConfig) -> Vec<Finding> {
        if self.plugins.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.max_parallel.max(1)));
        let metrics = Arc::new(metrics.clone());
        let config = Arc::new(config.clone());
        let mut tasks = JoinSet::new();

        for (index, plugin) in self.plugins.iter().enumerate() {
            let plugin = Arc::clone(plugin);
            let semaphore = Arc::clone(&semaphore);
            let metrics = Arc::clone(&metrics);
            let config = Arc::clone(&config);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let budget = plugin.timeout() + KILL_GRACE;
                let name = plugin.name().to_string();
                let run = tokio::task::spawn_blocking(move || plugin.evaluate(&metrics, &config));

                let finding = match tokio::time::timeout(budget, run).await {
                    Ok(Ok(finding)) => finding,
                    Ok(Err(e)) => {
                        tracing::warn!("plugin `{name}` crashed: {e}; treating as pass");
                        fallback(&name)
                    }
                    Err(_) => {
                        tracing::warn!("plugin `{name}` did not finish within {budget:?}; treating as pass");
                        fallback(&name)
                    }
                };
                (index, finding)
            });
        }

        let mut slots: Vec<Option<Finding>> = vec![None; self.plugins.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, finding)) => slots[index] = Some(finding),
                Err(e) => tracing::warn!("Plugin task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(self.plugins.iter())
            .map(|(slot, plugin)| slot.unwrap_or_else(|| fallback(plugin.name())))
            .collect()
    }
}

fn fallback(name: &str) -> Finding {
    Finding::new(name, Verdict::Pass, "plugin.pass").with_var("source", name)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
