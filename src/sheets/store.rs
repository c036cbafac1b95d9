//! The tabular store seam

use crate::sheets::{CellRange, TableRegion};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid range {0}")]
    InvalidRange(String),
}

/// Row-major string grid addressed by A1 ranges within the region's spreadsheet
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Rows in the range; trailing empty rows and cells may be omitted
    async fn read_range(
        &self,
        region: &TableRegion,
        range: &CellRange,
    ) -> Result<Vec<Vec<String>>, StoreError>;

    /// Overwrite the cells of `range`
    async fn write_range(
        &self,
        region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError>;

    /// Insert rows after the last non-empty row of the table in `range`
    async fn append_rows(
        &self,
        region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError>;

    async fn clear_range(&self, region: &TableRegion, range: &CellRange)
    -> Result<(), StoreError>;
}
