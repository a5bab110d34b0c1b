use super::{Judgement, Rule};
use crate::config::EffectiveConfig;
use crate::hooks::HookEvent;
use crate::metrics::Metrics;

/// Blocks oversized staged diffs and warns about lazy, tiny ones.
pub const DIFF_SIZE_RULE: Rule = Rule {
    name: "DiffSizeRule",
    applies_to: HookEvent::PreCommit,
    predicate: judge,
    message_key: "diff_size",
};

fn judge(metrics: &Metrics, config: &EffectiveConfig) -> Judgement {
    let Metrics::PreCommit(diff) = metrics else {
        return Judgement::pass("ok");
    };
    let lines = diff.lines_changed();

    let judgement = if lines > config.max_lines {
        Judgement::block("too_large")
    } else if lines < config.min_lines {
        Judgement::warn("too_small")
    } else {
        Judgement::pass("ok")
    };

    judgement
        .var("lines", lines)
        .var("files", diff.files_changed)
        .var("min", config.min_lines)
        .var("max", config.max_lines)
}
