use crate::digest::mentions::{MentionCollector, clean_text, strip_tags};
use crate::digest::timezone::format_latest_activity;
use crate::digest::topic::classify;
use crate::digest::types::{ActivityLevel, Digest};
use crate::metadata::UserDirectory;
use crate::slack::{Message, sort_chronologically};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Bodies shorter than this are ignored for mentions and topic text
pub const MIN_BODY_CHARS: usize = 10;

/// Bodies at least this long once tags are stripped (mentions kept as `@id`)
/// count as substantial
pub const MIN_SUBSTANTIAL_CHARS: usize = 15;

/// Turns one channel's messages into a [`Digest`], resolving mentioned users
/// through the run's directory
pub struct DigestBuilder<'a> {
    directory: &'a UserDirectory,
    time_range: String,
}

impl<'a> DigestBuilder<'a> {
    pub fn new(directory: &'a UserDirectory, time_range: impl Into<String>) -> Self {
        Self {
            directory,
            time_range: time_range.into(),
        }
    }

    pub async fn build(&self, channel_name: &str, messages: &[Message]) -> Digest {
        self.build_at(channel_name, messages, Utc::now()).await
    }

    /// Same as [`build`](Self::build) with an explicit generation time
    pub async fn build_at(
        &self,
        channel_name: &str,
        messages: &[Message],
        generated_at: DateTime<Utc>,
    ) -> Digest {
        if messages.is_empty() {
            return Digest::no_activity(channel_name, generated_at, self.time_range.clone());
        }

        let mut sorted = messages.to_vec();
        sort_chronologically(&mut sorted);

        let eligible: Vec<&Message> = sorted.iter().filter(|m| is_eligible(m)).collect();

        let mut mentions = MentionCollector::default();
        for message in &eligible {
            mentions.add_from(&message.body);
        }

        let resolved = self.directory.resolve_many(mentions.ids()).await;
        let names: HashMap<String, String> = resolved
            .iter()
            .map(|u| (u.id.clone(), u.display_name.clone()))
            .collect();

        let mut mentioned_users: Vec<String> = Vec::with_capacity(resolved.len());
        for user in resolved {
            if !mentioned_users.contains(&user.display_name) {
                mentioned_users.push(user.display_name);
            }
        }

        // Length is judged on the `@id` form so it does not depend on name lookups
        let substantial: Vec<String> = eligible
            .iter()
            .filter(|m| strip_tags(&m.body).chars().count() >= MIN_SUBSTANTIAL_CHARS)
            .map(|m| clean_text(&m.body, &names))
            .collect();

        let latest_ts = sorted.last().map(|m| m.ts).unwrap_or_default();

        let digest = Digest {
            channel_name: channel_name.to_string(),
            generated_at,
            message_count: messages.len(),
            substantial_message_count: substantial.len(),
            topic_summary: classify(&substantial),
            mentioned_users,
            activity_level: ActivityLevel::from_message_count(messages.len()),
            latest_activity_formatted: format_latest_activity(latest_ts),
            time_range: self.time_range.clone(),
        };

        tracing::debug!(
            channel = %channel_name,
            messages = digest.message_count,
            substantial = digest.substantial_message_count,
            mentions = digest.mentioned_users.len(),
            activity = %digest.activity_level,
            "Built digest"
        );

        digest
    }
}

/// Human messages whose raw body is long enough to look at
fn is_eligible(message: &Message) -> bool {
    !message.is_system && message.body.chars().count() >= MIN_BODY_CHARS
}
