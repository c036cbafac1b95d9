pub mod config;
pub mod digest;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod sheets;
pub mod slack;

pub use error::{Result, Slack2SheetsError};
