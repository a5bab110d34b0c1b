//! Verdicts and the provider contract shared by rules and plugins

use crate::config::EffectiveConfig;
use crate::hooks::HookEvent;
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Outcome of a single rule or plugin.
///
/// Variants are ordered by severity: `Pass < Warn < Block`. Aggregation takes
/// the maximum, so adding a finding can only raise the final verdict.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Pass,
    Warn,
    Block,
}

impl Verdict {
    /// Commutative, idempotent maximum. An empty input is a Pass.
    pub fn aggregate<I>(verdicts: I) -> Verdict
    where
        I: IntoIterator<Item = Verdict>,
    {
        verdicts.into_iter().max().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Warn => "warn",
            Verdict::Block => "block",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Warn => "WARN",
            Verdict::Block => "BLOCK",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Verdict::Pass),
            "warn" => Ok(Verdict::Warn),
            "block" => Ok(Verdict::Block),
            other => Err(format!("unknown verdict token `{other}`")),
        }
    }
}

/// What one provider concluded, plus everything needed to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Rule or plugin name, shown next to the rendered message.
    pub source: String,
    pub verdict: Verdict,
    /// Tone template key, e.g. `diff_size.too_large`.
    pub message_key: String,
    /// Values substituted into `{placeholders}` of the template.
    pub vars: BTreeMap<String, String>,
    /// Free text supplied by a plugin. Printed after the rendered template.
    pub detail: Option<String>,
}

impl Finding {
    pub fn new(source: impl Into<String>, verdict: Verdict, message_key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            verdict,
            message_key: message_key.into(),
            vars: BTreeMap::new(),
            detail: None,
        }
    }

    pub fn with_var(mut self, name: &str, value: impl ToString) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Anything that can judge a metrics snapshot: built-in rules run in-process,
/// plugins run as subprocesses behind the same contract.
pub trait VerdictProvider: Send + Sync {
    fn name(&self) -> &str;

    fn applies_to(&self, _event: HookEvent) -> bool {
        true
    }

    fn evaluate(&self, metrics: &Metrics, config: &EffectiveConfig) -> Finding;
}

/// Findings of one run, split into the headline and the supporting lines.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
}

impl Evaluation {
    /// `findings` must be in declared evaluation order: rules first, then plugins.
    pub fn new(findings: Vec<Finding>) -> Self {
        let verdict = Verdict::aggregate(findings.iter().map(|f| f.verdict));
        Self { verdict, findings }
    }

    /// The finding that supplies the headline message.
    ///
    /// The first finding carrying the aggregate verdict wins, so among several
    /// Blocks the earliest declared rule is the primary one.
    pub fn primary(&self) -> Option<&Finding> {
        self.primary_index().map(|i| &self.findings[i])
    }

    /// Every Warn-or-worse finding other than the primary one.
    pub fn supplementary(&self) -> Vec<&Finding> {
        let primary = self.primary_index();
        self.findings
            .iter()
            .enumerate()
            .filter(|(i, f)| Some(*i) != primary && f.verdict >= Verdict::Warn)
            .map(|(_, f)| f)
            .collect()
    }

    fn primary_index(&self) -> Option<usize> {
        if self.findings.is_empty() {
            return None;
        }
        self.findings
            .iter()
            .position(|f| f.verdict == self.verdict)
            .or(Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn verdict_strategy() -> impl Strategy<Value = Verdict> {
        prop_oneof![Just(Verdict::Pass), Just(Verdict::Warn), Just(Verdict::Block)]
    }

    #[test]
    fn test_verdict_ordering() {
        assert!(Verdict::Pass < Verdict::Warn);
        assert!(Verdict::Warn < Verdict::Block);
        assert_eq!(Verdict::aggregate(Vec::new()), Verdict::Pass);
    }

    #[test]
    fn test_verdict_tokens() {
        assert_eq!("pass".parse::<Verdict>().unwrap(), Verdict::Pass);
        assert_eq!("WARN".parse::<Verdict>().unwrap(), Verdict::Warn);
        assert_eq!(" Block ".parse::<Verdict>().unwrap(), Verdict::Block);
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_first_block_is_primary() {
        let eval = Evaluation::new(vec![
            Finding::new("A", Verdict::Warn, "a.warn"),
            Finding::new("B", Verdict::Block, "b.block"),
            Finding::new("C", Verdict::Block, "c.block"),
            Finding::new("D", Verdict::Pass, "d.ok"),
        ]);

        assert_eq!(eval.verdict, Verdict::Block);
        assert_eq!(eval.primary().unwrap().source, "B");

        let extra: Vec<_> = eval.supplementary().iter().map(|f| f.source.clone()).collect();
        assert_eq!(extra, vec!["A", "C"]);
    }

    #[test]
    fn test_all_pass_uses_first_finding() {
        let eval = Evaluation::new(vec![
            Finding::new("A", Verdict::Pass, "a.ok"),
            Finding::new("B", Verdict::Pass, "b.ok"),
        ]);
        assert_eq!(eval.verdict, Verdict::Pass);
        assert_eq!(eval.primary().unwrap().source, "A");
        assert!(eval.supplementary().is_empty());
        assert!(Evaluation::new(Vec::new()).primary().is_none());
    }

    proptest! {
        #[test]
        fn aggregate_ignores_order(mut verdicts in prop::collection::vec(verdict_strategy(), 0..16)) {
            let forward = Verdict::aggregate(verdicts.clone());
            verdicts.reverse();
            prop_assert_eq!(forward, Verdict::aggregate(verdicts.clone()));
            verdicts.sort();
            prop_assert_eq!(forward, Verdict::aggregate(verdicts.clone()));
        }

        #[test]
        fn aggregate_is_idempotent(verdicts in prop::collection::vec(verdict_strategy(), 0..16)) {
            let once = Verdict::aggregate(verdicts.clone());
            let doubled: Vec<_> = verdicts.iter().chain(verdicts.iter()).copied().collect();
            prop_assert_eq!(once, Verdict::aggregate(doubled));
        }

        #[test]
        fn aggregate_is_monotonic(verdicts in prop::collection::vec(verdict_strategy(), 0..16), extra in verdict_strategy()) {
            let before = Verdict::aggregate(verdicts.clone());
            let mut more = verdicts;
            more.push(extra);
            prop_assert!(Verdict::aggregate(more) >= before);
        }
    }
}
