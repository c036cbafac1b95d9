use crate::error::{Result, Slack2SheetsError};
use std::str::FromStr;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

#[derive(Debug, Clone)]
pub struct Settings {
    pub slack: SlackConfig,
    pub sheets: SheetsConfig,
    pub digest: DigestConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: String,
    /// Workspace id used to build `app.slack.com` channel links
    pub team_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub access_token: String,
    pub api_base: String,
    pub digest_tab: String,
    pub messages_tab: String,
    pub messages_header: String,
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub channels: Vec<String>,
    pub hours_back: u32,
    pub message_limit: u16,
    pub sync_message_count: u16,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    Settings::from_lookup(|key| std::env::var(key).ok())
}

impl Settings {
    /// Build settings from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let slack = SlackConfig {
            bot_token: required(&lookup, "SLACK_BOT_TOKEN")?,
            team_id: lookup("SLACK_TEAM_ID").filter(|v| !v.trim().is_empty()),
        };

        let sheets = SheetsConfig {
            spreadsheet_id: required(&lookup, "GOOGLE_SHEET_ID")?,
            access_token: required(&lookup, "GOOGLE_SHEETS_ACCESS_TOKEN")?,
            api_base: lookup("GOOGLE_SHEETS_API_BASE")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
            digest_tab: lookup("DIGEST_TAB").unwrap_or_else(|| "channel digests".to_string()),
            messages_tab: lookup("MESSAGES_TAB").unwrap_or_else(|| "project summary".to_string()),
            messages_header: lookup("MESSAGES_HEADER")
                .unwrap_or_else(|| "Meeting Cadence".to_string()),
        };

        let digest = DigestConfig {
            channels: parse_channel_list(
                &lookup("DIGEST_CHANNELS").unwrap_or_else(|| "general".to_string()),
            ),
            hours_back: parse_or(&lookup, "DIGEST_HOURS_BACK", 24)?,
            message_limit: parse_or(&lookup, "DIGEST_MESSAGE_LIMIT", 50)?,
            sync_message_count: parse_or(&lookup, "SYNC_MESSAGE_COUNT", 5)?,
        };

        let server = ServerConfig {
            host: lookup("EVENTS_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "EVENTS_PORT", 3000)?,
        };

        if digest.channels.is_empty() {
            return Err(Slack2SheetsError::Config(
                "DIGEST_CHANNELS must name at least one channel".to_string(),
            ));
        }

        Ok(Settings {
            slack,
            sheets,
            digest,
            server,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Slack2SheetsError::Config(format!("{} not set", key)))
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Slack2SheetsError::Config(format!("Invalid {}", key))),
        None => Ok(default),
    }
}

/// Split a comma separated channel list, tolerating `#` prefixes and blanks
fn parse_channel_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().trim_start_matches('#').to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
