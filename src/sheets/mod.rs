mod client;
mod header;
#[cfg(test)]
pub(crate) mod mock;
mod range;
mod reconcile;
mod region;
mod store;

pub use client::SheetsClient;
pub use header::{HEADER_SEARCH_ROWS, anchor_region, find_header_row, locate_header};
pub use range::{CellRange, column_letter, quote_tab};
pub use reconcile::{
    ReconcilePlan, RowFailure, RowUpdate, TableRow, WriteOperation, WriteTally, apply, reconcile,
    sync_rows,
};
pub use region::TableRegion;
pub use store::{StoreError, TabularStore};
