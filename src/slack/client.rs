use crate::config::SlackConfig;
use crate::error::{Result, Slack2SheetsError};
use crate::metadata::{ChannelInfo, ChannelType, UserInfo};
use crate::slack::types::SYSTEM_AUTHOR;
use crate::slack::{
    ChannelId, ChannelVisibility, ConversationSource, HistoryQuery, Message, MessageTs,
    SourceError,
};
use async_trait::async_trait;
use slack_morphism::errors::SlackClientError;
use slack_morphism::prelude::*;
use std::sync::Arc;

const CHANNEL_PAGE_LIMIT: u16 = 1000;
const USER_PAGE_LIMIT: u16 = 200;

pub struct SlackClient {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
    team_id: Option<String>,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperConnector::new()
            .map_err(|e| Slack2SheetsError::SlackApi(e.to_string()))?;

        let client = Arc::new(slack_morphism::SlackClient::new(connector));
        let token = SlackApiToken::new(config.bot_token.into());

        Ok(Self {
            client,
            token,
            team_id: config.team_id,
        })
    }

    /// Browser link to a channel, when the workspace id is configured
    pub fn channel_link(&self, channel: &ChannelId) -> Option<String> {
        channel_link(self.team_id.as_deref(), channel)
    }
}

pub fn channel_link(team_id: Option<&str>, channel: &ChannelId) -> Option<String> {
    team_id.map(|team| format!("https://app.slack.com/client/{}/{}", team, channel.as_str()))
}

fn map_client_error(err: SlackClientError) -> SourceError {
    match err {
        SlackClientError::ApiError(api) => SourceError::from_api_code(&api.code),
        other => SourceError::Transport(other.to_string()),
    }
}

fn conversation_type(visibility: ChannelVisibility) -> SlackConversationType {
    match visibility {
        ChannelVisibility::Public => SlackConversationType::Public,
        ChannelVisibility::Private => SlackConversationType::Private,
    }
}

fn next_cursor(metadata: Option<SlackResponseMetadata>) -> Option<SlackCursorId> {
    metadata
        .and_then(|m| m.next_cursor)
        .filter(|cursor| !cursor.0.is_empty())
}

fn user_info_from(user: SlackUser) -> UserInfo {
    UserInfo {
        id: user.id.to_string(),
        name: user.name,
        real_name: user.real_name,
        display_name: user.profile.as_ref().and_then(|p| p.display_name.clone()),
        is_bot: user.flags.is_bot.unwrap_or(false),
    }
}

fn message_from(message: SlackHistoryMessage) -> Option<Message> {
    let ts = MessageTs::new(message.origin.ts.to_string()).epoch_secs()?;
    let body = message.content.text.unwrap_or_default();

    let is_system = message.sender.bot_id.is_some()
        || matches!(
            message.subtype,
            Some(
                SlackMessageEventType::BotMessage
                    | SlackMessageEventType::ChannelJoin
                    | SlackMessageEventType::ChannelLeave
            )
        );

    Some(match message.sender.user {
        Some(user) if !is_system => Message::new(ts, user.to_string(), body),
        _ => Message {
            ts,
            author_id: SYSTEM_AUTHOR.to_string(),
            body,
            is_system: true,
        },
    })
}

#[async_trait]
impl ConversationSource for SlackClient {
    async fn list_channels(
        &self,
        visibility: ChannelVisibility,
    ) -> std::result::Result<Vec<ChannelInfo>, SourceError> {
        let session = self.client.open_session(&self.token);
        let channel_type = match visibility {
            ChannelVisibility::Public => ChannelType::PublicChannel,
            ChannelVisibility::Private => ChannelType::PrivateChannel,
        };

        let mut channels = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let request = SlackApiConversationsListRequest::new()
                .with_types(vec![conversation_type(visibility)])
                .with_exclude_archived(true)
                .with_limit(CHANNEL_PAGE_LIMIT)
                .opt_cursor(cursor.take());

            let response = session
                .conversations_list(&request)
                .await
                .map_err(map_client_error)?;

            channels.extend(response.channels.into_iter().map(|c| ChannelInfo {
                id: c.id.to_string(),
                name: c.name.unwrap_or_else(|| c.id.to_string()),
                channel_type,
                is_member: c.flags.is_member.unwrap_or(false),
            }));

            cursor = next_cursor(response.response_metadata);
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(
            visibility = ?visibility,
            count = channels.len(),
            "Listed channels"
        );
        Ok(channels)
    }

    async fn fetch_messages(
        &self,
        channel: &ChannelId,
        query: &HistoryQuery,
    ) -> std::result::Result<Vec<Message>, SourceError> {
        let session = self.client.open_session(&self.token);

        let request = SlackApiConversationsHistoryRequest::new()
            .with_channel(SlackChannelId(channel.as_str().to_string()))
            .opt_limit(query.limit)
            .opt_oldest(
                query
                    .oldest
                    .map(|oldest| SlackTs(MessageTs::from_epoch(oldest).0)),
            );

        let response = session
            .conversations_history(&request)
            .await
            .map_err(map_client_error)?;

        let total = response.messages.len();
        let messages: Vec<Message> = response
            .messages
            .into_iter()
            .filter_map(message_from)
            .collect();

        if messages.len() < total {
            tracing::debug!(
                channel_id = %channel.as_str(),
                skipped = total - messages.len(),
                "Skipped messages with unparseable timestamps"
            );
        }

        Ok(messages)
    }

    async fn resolve_user(&self, user_id: &str) -> std::result::Result<UserInfo, SourceError> {
        let session = self.client.open_session(&self.token);

        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));

        let response = session
            .users_info(&request)
            .await
            .map_err(map_client_error)?;

        Ok(user_info_from(response.user))
    }

    async fn list_users(&self) -> std::result::Result<Vec<UserInfo>, SourceError> {
        let session = self.client.open_session(&self.token);

        let mut users = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let request = SlackApiUsersListRequest::new()
                .with_limit(USER_PAGE_LIMIT)
                .opt_cursor(cursor.take());

            let response = session
                .users_list(&request)
                .await
                .map_err(map_client_error)?;

            users.extend(response.members.into_iter().map(user_info_from));

            cursor = next_cursor(response.response_metadata);
            if cursor.is_none() {
                break;
            }
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_link() {
        assert_eq!(
            channel_link(Some("T2AAHSB5F"), &ChannelId::new("C07QR3DV82K")).as_deref(),
            Some("https://app.slack.com/client/T2AAHSB5F/C07QR3DV82K")
        );
        assert_eq!(channel_link(None, &ChannelId::new("C07QR3DV82K")), None);
    }

    #[test]
    fn test_client_construction() {
        // Initialize crypto provider for rustls
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let config = SlackConfig {
            bot_token: "xoxb-test".to_string(),
            team_id: Some("T1".to_string()),
        };
        let client = SlackClient::new(config).unwrap();

        assert_eq!(
            client.channel_link(&ChannelId::new("C1")).as_deref(),
            Some("https://app.slack.com/client/T1/C1")
        );
    }
}
