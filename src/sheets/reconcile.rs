//! Key-based update-or-append reconciliation.
//!
//! [`reconcile`] is pure: it compares freshly computed rows with what the
//! table already holds and produces a [`ReconcilePlan`]. [`apply`] then
//! writes the plan one row at a time, collecting failures instead of
//! stopping at the first one.

use crate::sheets::{CellRange, StoreError, TableRegion, TabularStore};
use std::collections::HashMap;
use std::fmt;

/// One row to reconcile, identified by the cell in `key_column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub key_column: usize,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            key_column: 0,
        }
    }

    pub fn with_key_column(mut self, key_column: usize) -> Self {
        self.key_column = key_column;
        self
    }

    pub fn key(&self) -> &str {
        self.cells
            .get(self.key_column)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Cells truncated or padded with empty strings to exactly `width`
    pub fn padded(&self, width: usize) -> Vec<String> {
        pad(&self.cells, width)
    }
}

fn pad(cells: &[String], width: usize) -> Vec<String> {
    let mut out: Vec<String> = cells.iter().take(width).cloned().collect();
    out.resize(width, String::new());
    out
}

/// Overwrite of an existing row in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    /// 1-based sheet row
    pub row_number: u32,
    pub range: CellRange,
    pub row: TableRow,
    /// What the table held before, padded to the region width
    pub previous: Vec<String>,
}

impl RowUpdate {
    /// The write would leave the row exactly as it is
    pub fn is_noop(&self) -> bool {
        self.previous == self.row.padded(self.range.end_column + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub updates: Vec<RowUpdate>,
    /// New rows in input order; written below the last existing row
    pub appends: Vec<TableRow>,
    /// First free sheet row when the plan was made
    pub next_row: u32,
}

impl ReconcilePlan {
    /// Updates that would actually change a cell
    pub fn changed_updates(&self) -> usize {
        self.updates.iter().filter(|u| !u.is_noop()).count()
    }
}

/// Compute the writes that make `existing` reflect `new_rows` once per key.
///
/// `existing[i]` is the table content at sheet row `region.row_number(i)`.
/// When an existing key appears more than once the first occurrence is the
/// target and later copies are left alone. Existing rows with an empty key
/// never match. When `new_rows` repeats a key, the last row's content is used
/// at the first row's position in the output.
pub fn reconcile(
    region: &TableRegion,
    existing: &[Vec<String>],
    new_rows: Vec<TableRow>,
) -> ReconcilePlan {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (index, row) in existing.iter().enumerate() {
        let key = row.get(region.key_column).map(|k| k.trim()).unwrap_or("");
        if !key.is_empty() {
            positions.entry(key).or_insert(index);
        }
    }

    let mut plan = ReconcilePlan {
        next_row: region.row_number(existing.len()),
        ..Default::default()
    };

    for row in dedupe_last_wins(new_rows) {
        match positions.get(row.key().trim()) {
            Some(&index) => {
                let row_number = region.row_number(index);
                plan.updates.push(RowUpdate {
                    row_number,
                    range: region.row_range(row_number),
                    previous: pad(&existing[index], region.width),
                    row,
                });
            }
            None => plan.appends.push(row),
        }
    }

    plan
}

fn dedupe_last_wins(rows: Vec<TableRow>) -> Vec<TableRow> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<TableRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match seen.get(row.key().trim()) {
            Some(&index) => out[index] = row,
            None => {
                seen.insert(row.key().trim().to_string(), out.len());
                out.push(row);
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Update,
    Append,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::Update => write!(f, "update"),
            WriteOperation::Append => write!(f, "append"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub key: String,
    pub operation: WriteOperation,
    pub error: StoreError,
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteTally {
    pub updated: usize,
    pub appended: usize,
    /// Updates written with content identical to what was there
    pub unchanged: usize,
    pub failures: Vec<RowFailure>,
}

impl WriteTally {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Write every update and append in `plan`, one store call per row.
///
/// A failed row is recorded and the rest are still attempted. Appends land
/// on consecutive rows starting at `plan.next_row`.
pub async fn apply(
    store: &dyn TabularStore,
    region: &TableRegion,
    plan: ReconcilePlan,
) -> WriteTally {
    let mut tally = WriteTally::default();

    for update in plan.updates {
        let noop = update.is_noop();
        let cells = update.row.padded(region.width);
        match store
            .write_range(region, &update.range, std::slice::from_ref(&cells))
            .await
        {
            Ok(()) => {
                tally.updated += 1;
                if noop {
                    tally.unchanged += 1;
                }
                tracing::debug!(
                    tab = %region.tab_name,
                    row = update.row_number,
                    key = %update.row.key(),
                    unchanged = noop,
                    "Updated row"
                );
            }
            Err(error) => {
                tracing::warn!(
                    tab = %region.tab_name,
                    row = update.row_number,
                    key = %update.row.key(),
                    error = %error,
                    "Row update failed"
                );
                tally.failures.push(RowFailure {
                    key: update.row.key().to_string(),
                    operation: WriteOperation::Update,
                    error,
                });
            }
        }
    }

    let mut next_row = plan.next_row;
    for row in plan.appends {
        let cells = row.padded(region.width);
        let range = region.row_range(next_row);
        match store
            .append_rows(region, &range, std::slice::from_ref(&cells))
            .await
        {
            Ok(()) => {
                tracing::debug!(
                    tab = %region.tab_name,
                    row = next_row,
                    key = %row.key(),
                    "Appended row"
                );
                tally.appended += 1;
                next_row += 1;
            }
            Err(error) => {
                tracing::warn!(
                    tab = %region.tab_name,
                    key = %row.key(),
                    error = %error,
                    "Row append failed"
                );
                tally.failures.push(RowFailure {
                    key: row.key().to_string(),
                    operation: WriteOperation::Append,
                    error,
                });
            }
        }
    }

    tally
}

/// Read the region's current rows, reconcile and apply.
///
/// A failed read is returned as is: nothing is written when the current
/// contents are unknown.
pub async fn sync_rows(
    store: &dyn TabularStore,
    region: &TableRegion,
    rows: Vec<TableRow>,
) -> Result<WriteTally, StoreError> {
    let existing = store.read_range(region, &region.data_range()).await?;
    let plan = reconcile(region, &existing, rows);

    tracing::info!(
        tab = %region.tab_name,
        existing = existing.len(),
        updates = plan.updates.len(),
        changed = plan.changed_updates(),
        appends = plan.appends.len(),
        "Reconciling rows"
    );

    Ok(apply(store, region, plan).await)
}
