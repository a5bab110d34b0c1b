use regex::Regex;
use std::sync::LazyLock;

use super::{Judgement, Rule};
use crate::config::EffectiveConfig;
use crate::hooks::HookEvent;
use crate::metrics::Metrics;

/// Longest subject line that does not draw a warning
pub const SUBJECT_LIMIT: usize = 72;

/// Subjects that say nothing at all
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(wip|fix|fixes|fixed|fixup|update|updates|stuff|changes|misc|asdf|tmp|temp|test|\.+)\s*[.!]*\s*$",
    )
    .expect("placeholder pattern is valid")
});

/// Blocks empty and placeholder messages, warns about sloppy ones.
pub const MESSAGE_QUALITY_RULE: Rule = Rule {
    name: "MessageQualityRule",
    applies_to: HookEvent::CommitMsg,
    predicate: judge,
    message_key: "message_quality",
};

pub fn is_placeholder(subject: &str) -> bool {
    PLACEHOLDER.is_match(subject)
}

fn judge(metrics: &Metrics, config: &EffectiveConfig) -> Judgement {
    let Metrics::CommitMsg(message) = metrics else {
        return Judgement::pass("ok");
    };
    let subject = message.subject();

    let judgement = if message.message_text.trim().is_empty() {
        Judgement::block("empty")
    } else if is_placeholder(subject) {
        Judgement::block("placeholder")
    } else if message.subject_length > SUBJECT_LIMIT {
        Judgement::warn("subject_too_long")
    } else if !message.has_body && message.staged_lines > config.body_required_lines {
        Judgement::warn("missing_body")
    } else {
        Judgement::pass("ok")
    };

    judgement
        .var("subject", subject)
        .var("length", message.subject_length)
        .var("limit", SUBJECT_LIMIT)
        .var("lines", message.staged_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MessageMetrics;
    use crate::verdict::{Verdict, VerdictProvider};

    fn judge_message(raw: &str, staged_lines: u64) -> (Verdict, String) {
        let metrics = Metrics::CommitMsg(MessageMetrics::from_message(raw, staged_lines));
        let finding = MESSAGE_QUALITY_RULE.evaluate(&metrics, &EffectiveConfig::default());
        (finding.verdict, finding.message_key)
    }

    #[test]
    fn test_empty_message_blocks() {
        assert_eq!(judge_message("", 0), (Verdict::Block, "message_quality.empty".to_string()));
        assert_eq!(judge_message("# just a comment\n\n", 0).0, Verdict::Block);
    }

    #[test]
    fn test_placeholders_block() {
        for subject in ["fix", "WIP", "wip!", "update.", "stuff", "...", "  asdf  "] {
            assert_eq!(
                judge_message(subject, 0),
                (Verdict::Block, "message_quality.placeholder".to_string()),
                "subject {subject:?}"
            );
        }
    }

    #[test]
    fn test_placeholder_words_inside_real_subjects_pass() {
        assert!(!is_placeholder("fix null pointer check in parser"));
        assert!(!is_placeholder("Update README with install steps"));
    }

    #[test]
    fn test_long_subject_warns() {
        let subject = "a".repeat(200);
        assert_eq!(
            judge_message(&subject, 0),
            (Verdict::Warn, "message_quality.subject_too_long".to_string())
        );
        assert_eq!(judge_message(&"a".repeat(SUBJECT_LIMIT), 0).0, Verdict::Pass);
    }

    #[test]
    fn test_large_diff_needs_body() {
        let (verdict, key) = judge_message("Rework the scheduler", 400);
        assert_eq!(verdict, Verdict::Warn);
        assert_eq!(key, "message_quality.missing_body");

        let (verdict, _) = judge_message("Rework the scheduler\n\nWhy and how.", 400);
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn test_good_message_passes() {
        let raw = "Fix null pointer check in parser (#123)\n\nDetailed explanation...";
        assert_eq!(judge_message(raw, 0), (Verdict::Pass, "message_quality.ok".to_string()));
    }
}
