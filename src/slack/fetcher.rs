use crate::slack::{ChannelId, ConversationSource, HistoryQuery, Message, SourceError};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Which slice of channel history to read
#[derive(Debug, Clone, PartialEq)]
pub enum FetchWindow {
    /// The most recent `n` messages
    Latest(u16),
    /// Messages newer than `oldest`, at most `limit` of them
    Since { oldest: DateTime<Utc>, limit: u16 },
}

impl FetchWindow {
    /// Window reaching `hours` back from `now`; spans past the epoch start at the epoch
    pub fn last_hours(hours: u32, limit: u16, now: DateTime<Utc>) -> Self {
        let oldest = Duration::try_hours(i64::from(hours))
            .and_then(|span| now.checked_sub_signed(span))
            .filter(|oldest| *oldest > DateTime::UNIX_EPOCH)
            .unwrap_or(DateTime::UNIX_EPOCH);
        FetchWindow::Since { oldest, limit }
    }

    pub fn to_query(&self) -> HistoryQuery {
        match self {
            FetchWindow::Latest(n) => HistoryQuery {
                limit: Some(*n),
                oldest: None,
            },
            FetchWindow::Since { oldest, limit } => HistoryQuery {
                limit: Some(*limit),
                oldest: Some(oldest.timestamp_millis() as f64 / 1000.0),
            },
        }
    }
}

/// Reads channel history. No retries: a failed window is reported and the
/// caller may simply fetch it again.
pub struct MessageFetcher {
    source: Arc<dyn ConversationSource>,
}

impl MessageFetcher {
    pub fn new(source: Arc<dyn ConversationSource>) -> Self {
        Self { source }
    }

    /// Messages in upstream order (newest first for Slack). Callers that need
    /// chronological order must sort.
    pub async fn fetch(
        &self,
        channel: &ChannelId,
        window: &FetchWindow,
    ) -> Result<Vec<Message>, SourceError> {
        let query = window.to_query();
        match self.source.fetch_messages(channel, &query).await {
            Ok(messages) => {
                tracing::debug!(
                    channel_id = %channel.as_str(),
                    count = messages.len(),
                    limit = ?query.limit,
                    "Fetched channel history"
                );
                Ok(messages)
            }
            Err(SourceError::NotMember) => {
                tracing::warn!(
                    channel_id = %channel.as_str(),
                    "Bot is not in channel, invite it with /invite"
                );
                Err(SourceError::NotMember)
            }
            Err(e) => {
                tracing::warn!(
                    channel_id = %channel.as_str(),
                    error = %e,
                    "Failed to fetch channel history"
                );
                Err(e)
            }
        }
    }
}
