//! Channel digests: filtering, mention resolution, topic classification and
//! multi-timezone formatting

mod builder;
mod mentions;
mod timezone;
mod topic;
mod types;

pub use builder::{DigestBuilder, MIN_BODY_CHARS, MIN_SUBSTANTIAL_CHARS};
pub use mentions::{MAX_MENTIONS, MentionCollector, clean_text, mention_ids, strip_tags};
pub use timezone::{
    ROW_KEY_FORMAT, epoch_to_utc, format_epoch_zones, format_latest_activity, format_report_date,
    format_row_key, format_zones,
};
pub use topic::{LIMITED_ACTIVITY, TOPIC_RULES, TopicRule, classify};
pub use types::{ActivityLevel, Digest, NO_ACTIVITY_TIME};
