use super::{Judgement, Rule};
use crate::config::EffectiveConfig;
use crate::hooks::HookEvent;
use crate::metrics::Metrics;

/// Warns about long pushes, blocks pushes whose average commit is oversized.
pub const PUSH_SIZE_RULE: Rule = Rule {
    name: "PushSizeRule",
    applies_to: HookEvent::PrePush,
    predicate: judge,
    message_key: "push_size",
};

fn judge(metrics: &Metrics, config: &EffectiveConfig) -> Judgement {
    let Metrics::PrePush(push) = metrics else {
        return Judgement::pass("ok");
    };
    let budget = config.max_lines.saturating_mul(push.commit_count);

    let judgement = if push.total_lines_changed > budget {
        Judgement::block("unreviewed_batch")
    } else if push.commit_count > config.max_commits {
        Judgement::warn("too_many_commits")
    } else {
        Judgement::pass("ok")
    };

    judgement
        .var("commits", push.commit_count)
        .var("lines", push.total_lines_changed)
        .var("budget", budget)
        .var("max_commits", config.max_commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PushMetrics;
    use crate::verdict::{Verdict, VerdictProvider};

    fn verdict_for(commit_count: u64, total_lines_changed: u64) -> Verdict {
        let config = EffectiveConfig {
            max_lines: 100,
            max_commits: 5,
            ..EffectiveConfig::default()
        };
        let metrics = Metrics::PrePush(PushMetrics {
            commit_count,
            total_lines_changed,
        });
        PUSH_SIZE_RULE.evaluate(&metrics, &config).verdict
    }

    #[test]
    fn test_small_push_passes() {
        assert_eq!(verdict_for(3, 250), Verdict::Pass);
        assert_eq!(verdict_for(0, 0), Verdict::Pass);
    }

    #[test]
    fn test_commit_count_threshold() {
        assert_eq!(verdict_for(5, 10), Verdict::Pass);
        assert_eq!(verdict_for(6, 10), Verdict::Warn);
    }

    #[test]
    fn test_unreviewed_batch_blocks() {
        assert_eq!(verdict_for(3, 300), Verdict::Pass);
        assert_eq!(verdict_for(3, 301), Verdict::Block);
        assert_eq!(verdict_for(12, 5000), Verdict::Block);
    }
}
