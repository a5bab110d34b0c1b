use serde::Serialize;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::config::EffectiveConfig;
use crate::error::PluginError;
use crate::hooks::HookEvent;
use crate::metrics::Metrics;
use crate::verdict::{Finding, Verdict, VerdictProvider};

/// How often a running plugin is checked for exit
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Document written to a plugin's stdin
#[derive(Debug, Serialize)]
pub struct PluginPayload<'a> {
    pub event: HookEvent,
    pub metrics: &'a Metrics,
    pub config: &'a EffectiveConfig,
}

/// An external executable speaking the line protocol:
/// JSON in on stdin, `<pass|warn|block> [text]` out on stdout.
#[derive(Debug, Clone)]
pub struct SubprocessPlugin {
    name: String,
    path: PathBuf,
    workdir: PathBuf,
    timeout: Duration,
}

impl SubprocessPlugin {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, workdir: &Path, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            workdir: workdir.to_path_buf(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the plugin once and parse its answer
    pub fn run(&self, metrics: &Metrics, config: &EffectiveConfig) -> Result<(Verdict, Option<String>), PluginError> {
        let payload = serde_json::to_vec(&PluginPayload {
            event: metrics.event(),
            metrics,
            config,
        })
        .map_err(|source| PluginError::Payload {
            name: self.name.clone(),
            source,
        })?;

        let spawn_err = |source| PluginError::Spawn {
            name: self.name.clone(),
            source,
        };
        let mut child = Command::new(&self.path)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_err)?;

        // Feed stdin off-thread: a plugin that never reads a payload larger
        // than the pipe buffer must still hit the deadline below. A plugin may
        // exit without reading its input; a broken pipe is fine.
        if let Some(mut stdin) = child.stdin.take() {
            let name = self.name.clone();
            std::thread::spawn(move || {
                if let Err(e) = stdin.write_all(&payload) {
                    tracing::debug!(plugin = %name, "Plugin did not read its input: {e}");
                }
            });
        }

        // Drain stdout off-thread so a chatty plugin cannot fill the pipe and
        // stall, and a silent one cannot hang us past the deadline.
        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            std::thread::spawn(move || {
                let _ = tx.send(first_non_blank_line(stdout));
            });
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait().map_err(spawn_err)? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PluginError::Timeout {
                        name: self.name.clone(),
                        budget: self.timeout,
                    });
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        if !status.success() {
            return Err(PluginError::Exit {
                name: self.name.clone(),
                status: status.to_string(),
            });
        }

        // Grandchildren may keep the pipe open; never wait past the deadline.
        let remaining = deadline.saturating_duration_since(Instant::now());
        let line = rx
            .recv_timeout(remaining.max(POLL_INTERVAL))
            .map_err(|_| PluginError::Timeout {
                name: self.name.clone(),
                budget: self.timeout,
            })?;

        parse_response(&line).ok_or_else(|| PluginError::BadOutput {
            name: self.name.clone(),
            output: line,
        })
    }
}

impl VerdictProvider for SubprocessPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, metrics: &Metrics, config: &EffectiveConfig) -> Finding {
        let started = Instant::now();
        let (verdict, detail) = match self.run(metrics, config) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("{e}; treating as pass");
                (Verdict::Pass, None)
            }
        };
        tracing::debug!(
            plugin = %self.name,
            %verdict,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Plugin finished"
        );

        let finding = Finding::new(self.name.clone(), verdict, format!("plugin.{verdict}"))
            .with_var("source", self.name.clone());
        match detail {
            Some(text) => finding.with_detail(text),
            None => finding,
        }
    }
}

/// Read to EOF and keep the first non-blank line. Output after the verdict
/// line is discarded but still consumed, so the plugin never sees SIGPIPE.
fn first_non_blank_line(stdout: impl Read) -> String {
    let mut reader = BufReader::new(stdout);
    let mut first: Option<String> = None;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) if first.is_some() => {}
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if !line.trim().is_empty() {
                    first = Some(line.trim_end_matches(['\r', '\n']).to_string());
                }
            }
        }
    }
    first.unwrap_or_default()
}

/// Parse `<pass|warn|block> [free text]`. The token is case-insensitive.
pub fn parse_response(line: &str) -> Option<(Verdict, Option<String>)> {
    let line = line.trim();
    let (token, text) = match line.split_once(char::is_whitespace) {
        Some((token, text)) => (token, text.trim()),
        None => (line, ""),
    };
    let verdict = token.parse::<Verdict>().ok()?;
    let text = (!text.is_empty()).then(|| text.to_string());
    Some((verdict, text))
}
