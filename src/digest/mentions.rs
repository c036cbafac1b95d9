//! Mention extraction and message text cleaning

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Mentioned users kept per digest; extra mentions are dropped silently
pub const MAX_MENTIONS: usize = 10;

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<@([A-Z0-9]+)(?:\|[^>]*)?>").expect("mention pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// User ids mentioned in a raw message body, in order of appearance
pub fn mention_ids(text: &str) -> impl Iterator<Item = &str> {
    MENTION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Collects distinct mentioned ids across messages, up to a limit
#[derive(Debug, Clone)]
pub struct MentionCollector {
    ids: Vec<String>,
    limit: usize,
}

impl MentionCollector {
    pub fn new(limit: usize) -> Self {
        Self {
            ids: Vec::new(),
            limit,
        }
    }

    pub fn add_from(&mut self, text: &str) {
        for id in mention_ids(text) {
            if self.ids.len() >= self.limit {
                return;
            }
            if !self.ids.iter().any(|known| known == id) {
                self.ids.push(id.to_string());
            }
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl Default for MentionCollector {
    fn default() -> Self {
        Self::new(MAX_MENTIONS)
    }
}

/// Render mentions as `@name` (or `@id` when unknown), strip every other
/// `<...>` tag and trim. Cleaning already-cleaned text changes nothing.
pub fn clean_text(text: &str, names: &HashMap<String, String>) -> String {
    let with_names = MENTION.replace_all(text, |caps: &regex::Captures<'_>| {
        let id = &caps[1];
        let name = names.get(id).map(String::as_str).unwrap_or(id);
        format!("@{}", name)
    });

    TAG.replace_all(&with_names, "").trim().to_string()
}

/// Like [`clean_text`] but mentions stay as `@id`, so the result does not
/// depend on how (or whether) users resolve
pub fn strip_tags(text: &str) -> String {
    let with_ids = MENTION.replace_all(text, "@$1");
    TAG.replace_all(&with_ids, "").trim().to_string()
}
