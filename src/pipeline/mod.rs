//! Digest and message-sync runs over a conversation source and a tabular store

mod report;
mod rows;
mod runner;

pub use report::{ChannelOutcome, ChannelReport, RunReport};
pub use rows::{DIGEST_HEADER, MESSAGE_ROW_WIDTH, digest_row, message_rows};
pub use runner::Pipeline;
