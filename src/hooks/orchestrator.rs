use std::collections::BTreeMap;
use std::path::Path;

use super::{HookEvent, HookInvocation};
use crate::config::{ConfigResolver, EffectiveConfig};
use crate::error::EnvironmentError;
use crate::git::GitRepo;
use crate::metrics;
use crate::plugins::PluginDispatcher;
use crate::rules::RuleSet;
use crate::tone::Renderer;
use crate::verdict::{Evaluation, Finding, Verdict};

/// Where a run currently is. Stages advance strictly in declaration order;
/// a fatal error jumps straight to `Exited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    ConfigResolved,
    MetricsCollected,
    Evaluated,
    Rendered,
    Exited,
}

/// One line of the verdict report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Rule or plugin that produced the verdict
    pub source: String,
    pub verdict: Verdict,
    pub text: String,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct HookOutcome {
    pub event: HookEvent,
    pub verdict: Verdict,
    pub exit_code: u8,
    pub primary: Option<RenderedMessage>,
    pub supplementary: Vec<RenderedMessage>,
    /// Set when a Block was downgraded because `block_on_severe` is off
    pub advisory: Option<String>,
    pub stages: Vec<Stage>,
}

/// Drives one hook invocation from config resolution to exit code
pub struct HookOrchestrator {
    rules: RuleSet,
    stage: Stage,
    trace: Vec<Stage>,
}

impl Default for HookOrchestrator {
    fn default() -> Self {
        Self::new(RuleSet::baseline())
    }
}

impl HookOrchestrator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            stage: Stage::Start,
            trace: vec![Stage::Start],
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage visited by the last run, in order
    pub fn trace(&self) -> &[Stage] {
        &self.trace
    }

    /// Run the hook inside the repository containing `start_dir`
    pub async fn run(
        &mut self,
        invocation: &HookInvocation,
        start_dir: &Path,
    ) -> Result<HookOutcome, EnvironmentError> {
        self.stage = Stage::Start;
        self.trace = vec![Stage::Start];
        tracing::info!(event = %invocation.event(), "Running hook");

        let result = self.run_stages(invocation, start_dir).await;
        if let Err(e) = &result {
            tracing::debug!(stage = ?self.stage, "Hook aborted: {e:#}");
            self.advance(Stage::Exited);
        }
        result
    }

    async fn run_stages(
        &mut self,
        invocation: &HookInvocation,
        start_dir: &Path,
    ) -> Result<HookOutcome, EnvironmentError> {
        let git = GitRepo::discover(start_dir)?;
        let root = git.root();

        let config = ConfigResolver::resolve(&root);
        self.advance(Stage::ConfigResolved);

        let metrics = metrics::collect(invocation, &git)?;
        drop(git);
        self.advance(Stage::MetricsCollected);

        let mut findings = self.rules.evaluate(&metrics, &config);
        let plugin_findings = PluginDispatcher::discover(&root, &config)
            .dispatch(&metrics, &config)
            .await;
        findings.extend(plugin_findings);
        let evaluation = Evaluation::new(findings);
        self.advance(Stage::Evaluated);

        let renderer = Renderer::new(&config.insult_pack, config.shame_level);
        let primary = evaluation.primary().map(|f| render_finding(&renderer, f));
        let supplementary = evaluation
            .supplementary()
            .into_iter()
            .map(|f| render_finding(&renderer, f))
            .collect();
        let advisory = (evaluation.verdict == Verdict::Block && !config.block_on_severe)
            .then(|| renderer.render("advisory.block", &BTreeMap::new()));
        self.advance(Stage::Rendered);

        let exit_code = exit_code(evaluation.verdict, &config);
        self.advance(Stage::Exited);
        tracing::info!(verdict = %evaluation.verdict, exit_code, "Hook finished");

        Ok(HookOutcome {
            event: invocation.event(),
            verdict: evaluation.verdict,
            exit_code,
            primary,
            supplementary,
            advisory,
            stages: self.trace.clone(),
        })
    }

    fn advance(&mut self, next: Stage) {
        tracing::trace!(from = ?self.stage, to = ?next, "Stage transition");
        self.stage = next;
        self.trace.push(next);
    }
}

/// Only a Block stops git, and only while `block_on_severe` is on.
pub fn exit_code(verdict: Verdict, config: &EffectiveConfig) -> u8 {
    match verdict {
        Verdict::Block if config.block_on_severe => 1,
        _ => 0,
    }
}

fn render_finding(renderer: &Renderer, finding: &Finding) -> RenderedMessage {
    let text = renderer.render(&finding.message_key, &finding.vars);
    let text = match &finding.detail {
        Some(detail) => format!("{text} {detail}"),
        None => text,
    };
    RenderedMessage {
        source: finding.source.clone(),
        verdict: finding.verdict,
        text,
    }
}
