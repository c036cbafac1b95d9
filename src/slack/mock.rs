//! In-memory conversation source for unit tests

use crate::metadata::{ChannelInfo, ChannelType, UserInfo};
use crate::slack::{
    ChannelId, ChannelVisibility, ConversationSource, HistoryQuery, Message, SourceError,
};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Default)]
pub struct MockSource {
    pub channels: Vec<ChannelInfo>,
    pub users: Vec<UserInfo>,
    pub history: HashMap<String, Result<Vec<Message>, SourceError>>,
}

impl MockSource {
    pub fn with_channel(mut self, id: &str, name: &str, messages: Vec<Message>) -> Self {
        self.channels.push(ChannelInfo {
            id: id.to_string(),
            name: name.to_string(),
            channel_type: ChannelType::PublicChannel,
            is_member: true,
        });
        self.history.insert(id.to_string(), Ok(messages));
        self
    }

    pub fn with_failing_channel(mut self, id: &str, name: &str, error: SourceError) -> Self {
        self.channels.push(ChannelInfo {
            id: id.to_string(),
            name: name.to_string(),
            channel_type: ChannelType::PublicChannel,
            is_member: false,
        });
        self.history.insert(id.to_string(), Err(error));
        self
    }

    pub fn with_user(mut self, id: &str, display_name: &str) -> Self {
        self.users.push(UserInfo {
            id: id.to_string(),
            name: Some(display_name.to_lowercase()),
            real_name: None,
            display_name: Some(display_name.to_string()),
            is_bot: false,
        });
        self
    }
}

#[async_trait]
impl ConversationSource for MockSource {
    async fn list_channels(
        &self,
        visibility: ChannelVisibility,
    ) -> Result<Vec<ChannelInfo>, SourceError> {
        let wanted = match visibility {
            ChannelVisibility::Public => ChannelType::PublicChannel,
            ChannelVisibility::Private => ChannelType::PrivateChannel,
        };
        Ok(self
            .channels
            .iter()
            .filter(|c| c.channel_type == wanted)
            .cloned()
            .collect())
    }

    async fn fetch_messages(
        &self,
        channel: &ChannelId,
        query: &HistoryQuery,
    ) -> Result<Vec<Message>, SourceError> {
        let mut messages = self
            .history
            .get(channel.as_str())
            .cloned()
            .unwrap_or(Err(SourceError::NotFound))?;
        // Upstream order: newest first
        messages.sort_by(|a, b| b.ts.total_cmp(&a.ts));
        if let Some(oldest) = query.oldest {
            messages.retain(|m| m.ts >= oldest);
        }
        if let Some(limit) = query.limit {
            messages.truncate(usize::from(limit));
        }
        Ok(messages)
    }

    async fn resolve_user(&self, user_id: &str) -> Result<UserInfo, SourceError> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| SourceError::Api("user_not_found".to_string()))
    }

    async fn list_users(&self) -> Result<Vec<UserInfo>, SourceError> {
        Ok(self.users.clone())
    }
}
