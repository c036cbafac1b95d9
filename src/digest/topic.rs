//! Keyword topic classification.
//!
//! A fixed decision list: rules are tried in order against the lowercased
//! conversation text and the first match names the topic. Order matters,
//! e.g. the broad "ad" keyword of the first rule shadows the later rules.

/// Summary used when no message was long enough to classify
pub const LIMITED_ACTIVITY: &str = "Limited conversation activity in this timeframe.";

#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    /// At least one must occur (ignored when empty)
    pub any_of: &'static [&'static str],
    /// All must occur
    pub all_of: &'static [&'static str],
    pub summary: &'static str,
}

impl TopicRule {
    /// `text` must already be lowercase
    pub fn matches(&self, text: &str) -> bool {
        let any = self.any_of.is_empty() || self.any_of.iter().any(|k| text.contains(k));
        let all = self.all_of.iter().all(|k| text.contains(k));
        any && all
    }
}

pub const TOPIC_RULES: [TopicRule; 3] = [
    TopicRule {
        any_of: &["vpaid", "ad"],
        all_of: &[],
        summary: "Discussion focused on video ad integration and VPAID ad handling.",
    },
    TopicRule {
        any_of: &[],
        all_of: &["transmit", "integration"],
        summary: "Team coordination around Transmit integration testing and deployment.",
    },
    TopicRule {
        any_of: &["stream", "vod"],
        all_of: &[],
        summary: "Discussion about video streaming and VOD content delivery.",
    },
];

/// Name the topic of a set of substantial, cleaned message bodies
pub fn classify(parts: &[String]) -> String {
    if parts.is_empty() {
        return LIMITED_ACTIVITY.to_string();
    }

    let text = parts.join(" ").to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.summary.to_string())
        .unwrap_or_else(|| {
            format!(
                "Active discussion with {} substantial messages exchanged.",
                parts.len()
            )
        })
}
