//! Shared in-memory fakes for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use slack2sheets::config::{
    DEFAULT_SHEETS_API_BASE, DigestConfig, ServerConfig, Settings, SheetsConfig, SlackConfig,
};
use slack2sheets::metadata::{ChannelInfo, ChannelType, UserInfo};
use slack2sheets::sheets::{CellRange, StoreError, TableRegion, TabularStore};
use slack2sheets::slack::{
    ChannelId, ChannelVisibility, ConversationSource, HistoryQuery, Message, SourceError,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeSource {
    channels: Vec<ChannelInfo>,
    users: Vec<UserInfo>,
    history: HashMap<String, Result<Vec<Message>, SourceError>>,
}

impl FakeSource {
    pub fn channel(mut self, id: &str, name: &str, messages: Vec<Message>) -> Self {
        self.channels.push(ChannelInfo {
            id: id.to_string(),
            name: name.to_string(),
            channel_type: ChannelType::PublicChannel,
            is_member: true,
        });
        self.history.insert(id.to_string(), Ok(messages));
        self
    }

    pub fn private_channel(mut self, id: &str, name: &str, error: SourceError) -> Self {
        self.channels.push(ChannelInfo {
            id: id.to_string(),
            name: name.to_string(),
            channel_type: ChannelType::PrivateChannel,
            is_member: false,
        });
        self.history.insert(id.to_string(), Err(error));
        self
    }

    pub fn user(mut self, id: &str, display_name: &str) -> Self {
        self.users.push(UserInfo {
            id: id.to_string(),
            display_name: Some(display_name.to_string()),
            ..Default::default()
        });
        self
    }
}

#[async_trait]
impl ConversationSource for FakeSource {
    async fn list_channels(
        &self,
        visibility: ChannelVisibility,
    ) -> Result<Vec<ChannelInfo>, SourceError> {
        let wanted = match visibility {
            ChannelVisibility::Public => ChannelType::PublicChannel,
            ChannelVisibility::Private => ChannelType::PrivateChannel,
        };
        Ok(self
            .channels
            .iter()
            .filter(|c| c.channel_type == wanted)
            .cloned()
            .collect())
    }

    async fn fetch_messages(
        &self,
        channel: &ChannelId,
        query: &HistoryQuery,
    ) -> Result<Vec<Message>, SourceError> {
        let mut messages = self
            .history
            .get(channel.as_str())
            .cloned()
            .unwrap_or(Err(SourceError::NotFound))?;
        messages.sort_by(|a, b| b.ts.total_cmp(&a.ts));
        if let Some(oldest) = query.oldest {
            messages.retain(|m| m.ts >= oldest);
        }
        if let Some(limit) = query.limit {
            messages.truncate(usize::from(limit));
        }
        Ok(messages)
    }

    async fn resolve_user(&self, user_id: &str) -> Result<UserInfo, SourceError> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| SourceError::Api("user_not_found".to_string()))
    }

    async fn list_users(&self) -> Result<Vec<UserInfo>, SourceError> {
        Ok(self.users.clone())
    }
}

/// A spreadsheet held in memory: tab name to rows, index 0 is sheet row 1
#[derive(Default)]
pub struct FakeSheet {
    tabs: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl FakeSheet {
    pub fn rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.tabs
            .lock()
            .unwrap()
            .get(tab)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed(&self, tab: &str, rows: &[&[&str]]) {
        self.tabs.lock().unwrap().insert(
            tab.to_string(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
    }
}

fn slice(row: &[String], range: &CellRange) -> Vec<String> {
    let mut cells: Vec<String> = row
        .iter()
        .skip(range.start_column)
        .take(range.end_column + 1 - range.start_column)
        .cloned()
        .collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

#[async_trait]
impl TabularStore for FakeSheet {
    async fn read_range(
        &self,
        _region: &TableRegion,
        range: &CellRange,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let grid = self.rows(&range.tab);
        let start = range.start_row as usize - 1;
        let end = range
            .end_row
            .map_or(grid.len(), |r| r as usize)
            .min(grid.len());
        let mut rows: Vec<Vec<String>> = (start..end).map(|i| slice(&grid[i], range)).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn write_range(
        &self,
        _region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        let mut tabs = self.tabs.lock().unwrap();
        let grid = tabs.entry(range.tab.clone()).or_default();
        for (i, cells) in rows.iter().enumerate() {
            let index = range.start_row as usize - 1 + i;
            if grid.len() <= index {
                grid.resize(index + 1, Vec::new());
            }
            let row = &mut grid[index];
            let end = range.start_column + cells.len();
            if row.len() < end {
                row.resize(end, String::new());
            }
            row[range.start_column..end].clone_from_slice(cells);
        }
        Ok(())
    }

    async fn append_rows(
        &self,
        _region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        let mut tabs = self.tabs.lock().unwrap();
        let grid = tabs.entry(range.tab.clone()).or_default();
        let at = range.start_row as usize - 1;
        if grid.len() < at {
            grid.resize(at, Vec::new());
        }
        for (i, row) in rows.iter().enumerate() {
            grid.insert(at + i, row.clone());
        }
        Ok(())
    }

    async fn clear_range(&self, _region: &TableRegion, range: &CellRange) -> Result<(), StoreError> {
        let mut tabs = self.tabs.lock().unwrap();
        if let Some(grid) = tabs.get_mut(&range.tab) {
            let start = range.start_row as usize - 1;
            for row in grid.iter_mut().skip(start) {
                row.clear();
            }
        }
        Ok(())
    }
}

pub fn settings(channels: &[&str]) -> Settings {
    Settings {
        slack: SlackConfig {
            bot_token: "xoxb-test".to_string(),
            team_id: None,
        },
        sheets: SheetsConfig {
            spreadsheet_id: "sheet-1".to_string(),
            access_token: "token".to_string(),
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            digest_tab: "channel digests".to_string(),
            messages_tab: "project summary".to_string(),
            messages_header: "Meeting Cadence".to_string(),
        },
        digest: DigestConfig {
            channels: channels.iter().map(|c| c.to_string()).collect(),
            hours_back: 24,
            message_limit: 50,
            sync_message_count: 5,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
    }
}
