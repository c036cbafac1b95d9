//! Channel and user records as returned by the conversation source

/// Number of id characters kept when a user cannot be named
pub const TRUNCATED_ID_LEN: usize = 8;

/// Channel metadata information
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    /// Channel ID (e.g., C09NU1KFXHT)
    pub id: String,

    /// Channel name without # (e.g., "engineering", "general")
    pub name: String,

    pub channel_type: ChannelType,

    /// Whether the bot has joined the channel
    pub is_member: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    PublicChannel,
    PrivateChannel,
}

impl ChannelInfo {
    /// Get display name with # prefix
    pub fn display_name(&self) -> String {
        format!("#{}", self.name)
    }
}

/// User metadata information
#[derive(Debug, Clone, Default)]
pub struct UserInfo {
    /// User ID (e.g., U09JDBT2MCM)
    pub id: String,

    /// Username/handle (e.g., "john.doe")
    pub name: Option<String>,

    /// Real name (e.g., "John Doe")
    pub real_name: Option<String>,

    /// Display name (what shows in Slack)
    pub display_name: Option<String>,

    pub is_bot: bool,
}

impl UserInfo {
    /// Best available name: display name, then real name, then a truncated id.
    ///
    /// Both the single and the bulk lookup paths go through this, so an id
    /// always maps to the same label within a run.
    pub fn best_name(&self) -> String {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.real_name.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| truncate_id(&self.id))
    }
}

/// A user id paired with the name shown for it in digests and rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub id: String,
    pub display_name: String,
}

impl ResolvedUser {
    pub fn from_info(info: &UserInfo) -> Self {
        Self {
            id: info.id.clone(),
            display_name: info.best_name(),
        }
    }

    /// Placeholder used when the user cannot be looked up
    pub fn fallback(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            display_name: truncate_id(user_id),
        }
    }
}

pub fn truncate_id(user_id: &str) -> String {
    user_id.chars().take(TRUNCATED_ID_LEN).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
