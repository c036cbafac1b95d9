/// Author label used for messages without a human sender
pub const SYSTEM_AUTHOR: &str = "bot/system";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Slack message timestamp as sent on the wire (e.g. "1718000000.000200")
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTs(pub String);

impl MessageTs {
    pub fn new(ts: impl Into<String>) -> Self {
        Self(ts.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_epoch(secs: f64) -> Self {
        Self(format!("{:.6}", secs))
    }

    pub fn epoch_secs(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|s| s.is_finite())
    }
}

/// One channel message, read-only once fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Epoch seconds; the ordering key
    pub ts: f64,
    pub author_id: String,
    pub body: String,
    /// Bot posts, joins and other non-human messages
    pub is_system: bool,
}

impl Message {
    pub fn new(ts: f64, author_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            ts,
            author_id: author_id.into(),
            body: body.into(),
            is_system: false,
        }
    }

    pub fn system(ts: f64, body: impl Into<String>) -> Self {
        Self {
            ts,
            author_id: SYSTEM_AUTHOR.to_string(),
            body: body.into(),
            is_system: true,
        }
    }
}

/// Sort messages oldest first; timestamps that fail to compare keep their order
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.ts.partial_cmp(&b.ts).unwrap_or(std::cmp::Ordering::Equal));
}
