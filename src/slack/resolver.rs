use crate::metadata::ChannelInfo;
use crate::slack::{ChannelId, ChannelVisibility, ConversationSource, SourceError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("channel name must not be empty")]
    EmptyName,

    #[error("#{0} not found")]
    NotFound(String),

    #[error("failed to list channels: {0}")]
    Fetch(#[from] SourceError),
}

/// Maps channel names to ids.
///
/// Each visibility is listed at most once per resolver; later lookups in the
/// same run reuse the listing.
pub struct ChannelResolver {
    source: Arc<dyn ConversationSource>,
    public: OnceCell<Vec<ChannelInfo>>,
    private: OnceCell<Vec<ChannelInfo>>,
}

impl ChannelResolver {
    pub fn new(source: Arc<dyn ConversationSource>) -> Self {
        Self {
            source,
            public: OnceCell::new(),
            private: OnceCell::new(),
        }
    }

    /// Exact, case-sensitive name match; public channels are searched first
    pub async fn resolve(&self, name: &str) -> Result<ChannelId, ResolveError> {
        let name = name.trim_start_matches('#');
        if name.is_empty() {
            return Err(ResolveError::EmptyName);
        }

        for visibility in ChannelVisibility::ALL {
            let channels = self.listing(visibility).await?;
            if let Some(channel) = channels.iter().find(|c| c.name == name) {
                tracing::debug!(
                    channel = %name,
                    channel_id = %channel.id,
                    visibility = ?visibility,
                    "Resolved channel"
                );
                return Ok(ChannelId::new(channel.id.clone()));
            }
        }

        tracing::warn!(channel = %name, "Channel not visible to the bot");
        Err(ResolveError::NotFound(name.to_string()))
    }

    /// Every channel the bot can see, public first
    pub async fn all_channels(&self) -> Result<Vec<ChannelInfo>, ResolveError> {
        let mut all = Vec::new();
        for visibility in ChannelVisibility::ALL {
            all.extend(self.listing(visibility).await?.iter().cloned());
        }
        Ok(all)
    }

    async fn listing(&self, visibility: ChannelVisibility) -> Result<&[ChannelInfo], SourceError> {
        let cell = match visibility {
            ChannelVisibility::Public => &self.public,
            ChannelVisibility::Private => &self.private,
        };

        let channels = cell
            .get_or_try_init(|| async {
                let channels = self.source.list_channels(visibility).await?;
                tracing::debug!(
                    visibility = ?visibility,
                    count = channels.len(),
                    "Fetched channel listing"
                );
                Ok::<_, SourceError>(channels)
            })
            .await?;

        Ok(channels.as_slice())
    }
}
