use crate::config::SheetsConfig;
use crate::error::{Result, Slack2SheetsError};
use crate::sheets::{CellRange, StoreError, TableRegion, TabularStore};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Sheets v4 values API over reqwest.
///
/// Values are written with `valueInputOption=RAW` so timestamps and names
/// are stored exactly as produced.
pub struct SheetsClient {
    http: reqwest::Client,
    access_token: String,
    api_base: Url,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: String,
    major_dimension: &'static str,
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    properties: SpreadsheetProperties,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base).map_err(|e| {
            Slack2SheetsError::Config(format!("Invalid GOOGLE_SHEETS_API_BASE: {}", e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            access_token: config.access_token.clone(),
            api_base,
        })
    }

    /// Spreadsheet title; doubles as a connectivity check
    pub async fn spreadsheet_title(&self, sheet_id: &str) -> std::result::Result<String, StoreError> {
        let mut url = self.url(&["spreadsheets", sheet_id])?;
        url.query_pairs_mut().append_pair("fields", "properties.title");

        let response = self.send(self.http.get(url)).await?;
        let sheet: Spreadsheet = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(sheet.properties.title)
    }

    fn url(&self, segments: &[&str]) -> std::result::Result<Url, StoreError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRange(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `spreadsheets/{id}/values/{range}` with an optional `:action` suffix
    fn values_url(
        &self,
        region: &TableRegion,
        range: &CellRange,
        action: Option<&str>,
    ) -> std::result::Result<Url, StoreError> {
        let mut target = range.to_string();
        if let Some(action) = action {
            target.push(':');
            target.push_str(action);
        }
        self.url(&["spreadsheets", &region.sheet_id, "values", &target])
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, StoreError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        })
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn read_range(
        &self,
        region: &TableRegion,
        range: &CellRange,
    ) -> std::result::Result<Vec<Vec<String>>, StoreError> {
        let url = self.values_url(region, range, None)?;
        let response = self.send(self.http.get(url)).await?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_range(
        &self,
        region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> std::result::Result<(), StoreError> {
        let mut url = self.values_url(region, range, None)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRangeBody {
            range: range.to_string(),
            major_dimension: "ROWS",
            values: rows,
        };
        self.send(self.http.put(url).json(&body)).await?;
        Ok(())
    }

    async fn append_rows(
        &self,
        region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> std::result::Result<(), StoreError> {
        let mut url = self.values_url(region, range, Some("append"))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = ValueRangeBody {
            range: range.to_string(),
            major_dimension: "ROWS",
            values: rows,
        };
        self.send(self.http.post(url).json(&body)).await?;
        Ok(())
    }

    async fn clear_range(
        &self,
        region: &TableRegion,
        range: &CellRange,
    ) -> std::result::Result<(), StoreError> {
        let url = self.values_url(region, range, Some("clear"))?;
        self.send(self.http.post(url).json(&serde_json::json!({})))
            .await?;
        Ok(())
    }
}
