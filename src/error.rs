use crate::sheets::StoreError;
use crate::slack::{ResolveError, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Slack2SheetsError {
    #[error("Slack API error: {0}")]
    SlackApi(String),

    #[error("Conversation source error: {0}")]
    Source(#[from] SourceError),

    #[error("Channel resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Sheets error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Slack2SheetsError>;
