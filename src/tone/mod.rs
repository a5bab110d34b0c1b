//! Tone renderer
//!
//! Turns a message key plus template variables into text in the configured
//! insult pack and shame level. Packs are embedded TOML; lookups fall back
//! `(pack, level)` → `(pack, sarcastic)` → `(neutral, level)` → generic text,
//! so rendering never fails.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::ShameLevel;
use crate::error::RenderError;

/// Pack every other pack falls back to. Covers every key at every level.
pub const DEFAULT_PACK: &str = "neutral";

const PACKS_TOML: &str = include_str!("packs.toml");

type Templates = BTreeMap<String, String>;
type Pack = BTreeMap<String, Templates>;

static PACKS: LazyLock<BTreeMap<String, Pack>> = LazyLock::new(|| {
    toml::from_str(PACKS_TOML).unwrap_or_else(|e| {
        tracing::error!("Embedded insult packs are malformed: {e}");
        BTreeMap::new()
    })
});

/// Names of the built-in packs, sorted
pub fn pack_names() -> Vec<&'static str> {
    PACKS.keys().map(String::as_str).collect()
}

pub fn has_pack(name: &str) -> bool {
    PACKS.contains_key(name)
}

/// Render `key` without variables
pub fn render(key: &str, pack: &str, level: ShameLevel) -> String {
    render_with(key, pack, level, &BTreeMap::new())
}

/// Render `key` and substitute `{name}` placeholders from `vars`
pub fn render_with(
    key: &str,
    pack: &str,
    level: ShameLevel,
    vars: &BTreeMap<String, String>,
) -> String {
    if !has_pack(pack) {
        tracing::warn!("{}", RenderError::UnknownPack(pack.to_string()));
    }
    let template = lookup(key, pack, level).unwrap_or_else(|| {
        tracing::warn!("{}", RenderError::UnknownKey(key.to_string()));
        generic(key)
    });
    substitute(template, vars)
}

/// Renderer bound to one pack and level for the duration of a run.
///
/// Validates the pack name once so an unknown pack is reported a single time
/// rather than once per message.
#[derive(Debug, Clone)]
pub struct Renderer {
    pack: String,
    level: ShameLevel,
}

impl Renderer {
    pub fn new(pack: &str, level: ShameLevel) -> Self {
        let pack = if has_pack(pack) {
            pack.to_string()
        } else {
            tracing::warn!("{}", RenderError::UnknownPack(pack.to_string()));
            DEFAULT_PACK.to_string()
        };
        Self { pack, level }
    }

    pub fn pack(&self) -> &str {
        &self.pack
    }

    pub fn level(&self) -> ShameLevel {
        self.level
    }

    pub fn render(&self, key: &str, vars: &BTreeMap<String, String>) -> String {
        render_with(key, &self.pack, self.level, vars)
    }
}

fn lookup(key: &str, pack: &str, level: ShameLevel) -> Option<&'static str> {
    let find = |pack: &str, level: ShameLevel| {
        PACKS
            .get(pack)
            .and_then(|p| p.get(level.as_str()))
            .and_then(|templates| templates.get(key))
            .map(String::as_str)
    };

    find(pack, level)
        .or_else(|| find(pack, ShameLevel::Sarcastic))
        .or_else(|| find(DEFAULT_PACK, level))
}

/// Last resort when no pack knows the key
fn generic(key: &str) -> &'static str {
    let outcome = key.rsplit('.').next().unwrap_or(key);
    match outcome {
        "ok" | "pass" => "Nothing to complain about. This time.",
        _ => "Something about this change needs another look.",
    }
}

/// Replace `{name}` with its value. Unknown placeholders stay as written.
fn substitute(template: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &[
        "diff_size.too_large",
        "diff_size.too_small",
        "diff_size.ok",
        "message_quality.empty",
        "message_quality.placeholder",
        "message_quality.subject_too_long",
        "message_quality.missing_body",
        "message_quality.ok",
        "push_size.unreviewed_batch",
        "push_size.too_many_commits",
        "push_size.ok",
        "plugin.pass",
        "plugin.warn",
        "plugin.block",
        "advisory.block",
    ];

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builtin_packs_load() {
        assert_eq!(
            pack_names(),
            vec!["corporate", "dad", "neutral", "pirate", "shakespeare"]
        );
    }

    #[test]
    fn test_neutral_covers_every_key_and_level() {
        for level in ShameLevel::ALL {
            for key in KEYS {
                assert!(
                    lookup(key, DEFAULT_PACK, level).is_some(),
                    "neutral/{level} is missing {key}"
                );
            }
        }
    }

    #[test]
    fn test_substitutes_variables() {
        let text = render_with(
            "diff_size.too_large",
            "neutral",
            ShameLevel::Sarcastic,
            &vars(&[("lines", "80"), ("max", "50")]),
        );
        assert!(text.contains("80 lines"));
        assert!(text.contains("50"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        assert_eq!(substitute("{a} and {b}", &vars(&[("a", "1")])), "1 and {b}");
        assert_eq!(substitute("dangling {brace", &BTreeMap::new()), "dangling {brace");
        assert_eq!(substitute("", &BTreeMap::new()), "");
    }

    #[test]
    fn test_pack_falls_back_to_its_sarcastic_level() {
        // dad has no gentle entry for too_small
        assert_eq!(
            render("diff_size.too_small", "dad", ShameLevel::Gentle),
            render("diff_size.too_small", "dad", ShameLevel::Sarcastic)
        );
    }

    #[test]
    fn test_pack_falls_back_to_neutral() {
        assert_eq!(
            render("push_size.ok", "pirate", ShameLevel::Savage),
            render("push_size.ok", "neutral", ShameLevel::Savage)
        );
    }

    #[test]
    fn test_unknown_pack_renders_neutral() {
        let klingon = render_with(
            "message_quality.empty",
            "klingon",
            ShameLevel::Savage,
            &BTreeMap::new(),
        );
        assert_eq!(klingon, render("message_quality.empty", "neutral", ShameLevel::Savage));

        let renderer = Renderer::new("klingon", ShameLevel::Gentle);
        assert_eq!(renderer.pack(), DEFAULT_PACK);
        assert!(!renderer.render("diff_size.ok", &BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_unknown_key_uses_generic_text() {
        assert_eq!(
            render("mystery.ok", "dad", ShameLevel::Savage),
            "Nothing to complain about. This time."
        );
        assert_eq!(
            render("mystery.explodes", "neutral", ShameLevel::Gentle),
            "Something about this change needs another look."
        );
    }

    #[test]
    fn test_pack_specific_text_is_used() {
        let text = render_with(
            "message_quality.placeholder",
            "dad",
            ShameLevel::Sarcastic,
            &vars(&[("subject", "fix")]),
        );
        assert_eq!(text, "\"fix\"? Hi \"fix\", I'm Dad.");
    }
}
