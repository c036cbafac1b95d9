//! Channel and user metadata
//!
//! The user directory resolves ids to display names for a single run. It is
//! created per run and dropped with it, so there is no TTL or eviction.

mod cache;
mod types;

pub use cache::{CacheStats, UserDirectory};
pub use types::{ChannelInfo, ChannelType, ResolvedUser, TRUNCATED_ID_LEN, UserInfo, truncate_id};
