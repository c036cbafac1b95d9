//! The conversation source seam: everything the digest engine needs from Slack

use crate::metadata::{ChannelInfo, UserInfo};
use crate::slack::{ChannelId, Message};
use async_trait::async_trait;
use thiserror::Error;

/// Channel listings are scoped per visibility by the Slack API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelVisibility {
    Public,
    Private,
}

impl ChannelVisibility {
    pub const ALL: [ChannelVisibility; 2] = [ChannelVisibility::Public, ChannelVisibility::Private];
}

/// History request bounds; both unset means the API default page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub limit: Option<u16>,
    /// Oldest epoch second to include
    pub oldest: Option<f64>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    #[error("bot is not a member of the channel")]
    NotMember,

    #[error("channel not found")]
    NotFound,

    #[error("Slack API error: {0}")]
    Api(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl SourceError {
    /// Map a Slack API error code to a typed error
    pub fn from_api_code(code: &str) -> Self {
        match code {
            "not_in_channel" => SourceError::NotMember,
            "channel_not_found" => SourceError::NotFound,
            other => SourceError::Api(other.to_string()),
        }
    }
}

#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// All non-archived channels of one visibility, across every page
    async fn list_channels(
        &self,
        visibility: ChannelVisibility,
    ) -> Result<Vec<ChannelInfo>, SourceError>;

    /// Channel history, in whatever order the upstream returns it
    async fn fetch_messages(
        &self,
        channel: &ChannelId,
        query: &HistoryQuery,
    ) -> Result<Vec<Message>, SourceError>;

    async fn resolve_user(&self, user_id: &str) -> Result<UserInfo, SourceError>;

    /// Every workspace member, for bulk name resolution
    async fn list_users(&self) -> Result<Vec<UserInfo>, SourceError>;
}
