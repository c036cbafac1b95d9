//! Conversions from digests and messages into reconcilable rows

use crate::digest::{Digest, ROW_KEY_FORMAT, clean_text, format_row_key};
use crate::sheets::TableRow;
use crate::slack::{Message, SYSTEM_AUTHOR, sort_chronologically};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const DIGEST_HEADER: [&str; 8] = [
    "Channel",
    "Generated (UTC)",
    "Messages",
    "Substantial",
    "Activity",
    "Latest Activity",
    "Mentioned Users",
    "Summary",
];

pub const MESSAGE_ROW_WIDTH: usize = 4;

/// One row per channel, keyed by `#channel` so each run overwrites it
pub fn digest_row(digest: &Digest) -> TableRow {
    TableRow::new(vec![
        format!("#{}", digest.channel_name),
        digest.generated_at.format(ROW_KEY_FORMAT).to_string(),
        digest.message_count.to_string(),
        digest.substantial_message_count.to_string(),
        digest.activity_level.to_string(),
        digest.latest_activity_formatted.clone(),
        digest.mentioned_users.join(", "),
        digest.topic_summary.clone(),
    ])
}

/// Message-per-row transform, oldest first:
/// `[posted at (UTC), "author: text", run stamp, channel link]`.
///
/// `names` maps user ids to display names; unknown authors keep their id.
pub fn message_rows(
    messages: &[Message],
    names: &HashMap<String, String>,
    run_at: DateTime<Utc>,
    channel_link: Option<&str>,
) -> Vec<TableRow> {
    let mut sorted = messages.to_vec();
    sort_chronologically(&mut sorted);

    let stamp = format!("Automated by slack2sheets at {}", run_at.format(ROW_KEY_FORMAT));
    let link = channel_link.unwrap_or_default().to_string();

    sorted
        .iter()
        .map(|message| {
            let author = if message.is_system {
                SYSTEM_AUTHOR
            } else {
                names
                    .get(&message.author_id)
                    .map(String::as_str)
                    .unwrap_or(&message.author_id)
            };

            TableRow::new(vec![
                format_row_key(message.ts),
                format!("{}: {}", author, clean_text(&message.body, names)),
                stamp.clone(),
                link.clone(),
            ])
        })
        .collect()
}
