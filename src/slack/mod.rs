mod client;
mod events;
mod fetcher;
#[cfg(test)]
pub(crate) mod mock;
mod resolver;
mod source;
mod types;

pub use client::{SlackClient, channel_link};
pub use events::{EventState, events_router};
pub use fetcher::{FetchWindow, MessageFetcher};
pub use resolver::{ChannelResolver, ResolveError};
pub use source::{ChannelVisibility, ConversationSource, HistoryQuery, SourceError};
pub use types::{ChannelId, Message, MessageTs, SYSTEM_AUTHOR, sort_chronologically};
