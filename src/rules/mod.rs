//! Built-in shame rules
//!
//! A [`Rule`] is plain data: a name, the hook event it judges, a pure
//! predicate and the message key namespace its templates live under. The
//! [`RuleSet`] keeps rules in declared order, which decides whose message
//! headlines when several rules block at once.

use crate::config::EffectiveConfig;
use crate::hooks::HookEvent;
use crate::metrics::Metrics;
use crate::verdict::{Finding, Verdict, VerdictProvider};

mod diff_size;
mod message_quality;
mod push_size;

pub use diff_size::DIFF_SIZE_RULE;
pub use message_quality::{MESSAGE_QUALITY_RULE, SUBJECT_LIMIT, is_placeholder};
pub use push_size::PUSH_SIZE_RULE;

/// What a predicate concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgement {
    pub verdict: Verdict,
    /// Appended to the rule's message key: `diff_size` + `too_large`
    pub outcome: &'static str,
    pub vars: Vec<(&'static str, String)>,
}

impl Judgement {
    pub fn pass(outcome: &'static str) -> Self {
        Self::new(Verdict::Pass, outcome)
    }

    pub fn warn(outcome: &'static str) -> Self {
        Self::new(Verdict::Warn, outcome)
    }

    pub fn block(outcome: &'static str) -> Self {
        Self::new(Verdict::Block, outcome)
    }

    fn new(verdict: Verdict, outcome: &'static str) -> Self {
        Self {
            verdict,
            outcome,
            vars: Vec::new(),
        }
    }

    pub fn var(mut self, name: &'static str, value: impl ToString) -> Self {
        self.vars.push((name, value.to_string()));
        self
    }
}

/// Rule predicates must be pure functions of their inputs.
pub type Predicate = fn(&Metrics, &EffectiveConfig) -> Judgement;

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies_to: HookEvent,
    pub predicate: Predicate,
    pub message_key: &'static str,
}

impl VerdictProvider for Rule {
    fn name(&self) -> &str {
        self.name
    }

    fn applies_to(&self, event: HookEvent) -> bool {
        self.applies_to == event
    }

    fn evaluate(&self, metrics: &Metrics, config: &EffectiveConfig) -> Finding {
        let judgement = (self.predicate)(metrics, config);
        let key = format!("{}.{}", self.message_key, judgement.outcome);

        judgement
            .vars
            .into_iter()
            .fold(Finding::new(self.name, judgement.verdict, key), |finding, (name, value)| {
                finding.with_var(name, value)
            })
    }
}

/// Ordered collection of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The three stock rules in their declared order
    pub fn baseline() -> Self {
        Self::new(vec![DIFF_SIZE_RULE, MESSAGE_QUALITY_RULE, PUSH_SIZE_RULE])
    }

    /// Append a rule after the existing ones
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every rule that applies to the metrics' event, in order
    pub fn evaluate(&self, metrics: &Metrics, config: &EffectiveConfig) -> Vec<Finding> {
        let event = metrics.event();
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(event))
            .map(|rule| {
                let finding = rule.evaluate(metrics, config);
                tracing::debug!(rule = rule.name, verdict = %finding.verdict, key = %finding.message_key, "Rule evaluated");
                finding
            })
            .collect()
    }
}
