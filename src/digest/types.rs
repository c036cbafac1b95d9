use crate::digest::timezone::{format_report_date, format_zones};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Shown in place of a latest-activity time when there were no messages
pub const NO_ACTIVITY_TIME: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    High,
    Moderate,
    Low,
}

impl ActivityLevel {
    pub fn from_message_count(count: usize) -> Self {
        if count > 10 {
            ActivityLevel::High
        } else if count > 3 {
            ActivityLevel::Moderate
        } else {
            ActivityLevel::Low
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityLevel::High => "High",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Summary of one channel's activity over a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub channel_name: String,
    pub generated_at: DateTime<Utc>,
    pub message_count: usize,
    pub substantial_message_count: usize,
    pub topic_summary: String,
    /// Distinct display names, first-mentioned first, at most 10
    pub mentioned_users: Vec<String>,
    pub activity_level: ActivityLevel,
    pub latest_activity_formatted: String,
    /// Human label of the fetch window, e.g. "Last 24 hours"
    pub time_range: String,
}

impl Digest {
    pub fn no_activity(
        channel_name: &str,
        generated_at: DateTime<Utc>,
        time_range: impl Into<String>,
    ) -> Self {
        Self {
            channel_name: channel_name.to_string(),
            generated_at,
            message_count: 0,
            substantial_message_count: 0,
            topic_summary: format!("No activity in #{}", channel_name),
            mentioned_users: Vec::new(),
            activity_level: ActivityLevel::Low,
            latest_activity_formatted: NO_ACTIVITY_TIME.to_string(),
            time_range: time_range.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message_count == 0
    }

    /// Mentioned users as `@a, @b`, or a placeholder sentence
    pub fn mentions_line(&self) -> String {
        if self.mentioned_users.is_empty() {
            "No specific user mentions found".to_string()
        } else {
            self.mentioned_users
                .iter()
                .map(|name| format!("@{}", name))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Multi-line text summary for humans
    pub fn render(&self) -> String {
        if self.is_empty() {
            return format!("📭 {}", self.topic_summary);
        }

        format!(
            "🔸 #{channel} Channel Summary\n\
             📅 {date} at {zones}\n\
             💬 {total} total messages | {substantial} substantial messages\n\
             \n\
             📝 CONVERSATION OVERVIEW:\n\
             {topic}\n\
             \n\
             👥 MENTIONED USERS:\n   \
             {mentions}\n\
             \n\
             📊 ACTIVITY METRICS:\n   \
             • Time Range: {range}\n   \
             • Most Recent: {latest}\n   \
             • Channel Activity: {level}\n",
            channel = self.channel_name,
            date = format_report_date(self.generated_at),
            zones = format_zones(self.generated_at),
            total = self.message_count,
            substantial = self.substantial_message_count,
            topic = self.topic_summary,
            mentions = self.mentions_line(),
            range = self.time_range,
            latest = self.latest_activity_formatted,
            level = self.activity_level,
        )
    }
}
