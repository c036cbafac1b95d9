//! A1 notation for ranges inside a named tab

use std::fmt;

/// Column letters for a zero-based column index: 0 -> A, 25 -> Z, 26 -> AA
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Tab names are always quoted so spaces and punctuation survive
pub fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// A rectangular range; rows are 1-based, columns zero-based.
/// `end_row: None` leaves the range open downwards (`A2:D`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub tab: String,
    pub start_column: usize,
    pub end_column: usize,
    pub start_row: u32,
    pub end_row: Option<u32>,
}

impl CellRange {
    /// One full row `width` columns wide
    pub fn row(tab: &str, row: u32, width: usize) -> Self {
        Self {
            tab: tab.to_string(),
            start_column: 0,
            end_column: width.saturating_sub(1),
            start_row: row,
            end_row: Some(row),
        }
    }

    /// Everything from `start_row` down, `width` columns wide
    pub fn rows_from(tab: &str, start_row: u32, width: usize) -> Self {
        Self {
            tab: tab.to_string(),
            start_column: 0,
            end_column: width.saturating_sub(1),
            start_row,
            end_row: None,
        }
    }

    /// A single column between two rows, inclusive
    pub fn column(tab: &str, column: usize, start_row: u32, end_row: u32) -> Self {
        Self {
            tab: tab.to_string(),
            start_column: column,
            end_column: column,
            start_row,
            end_row: Some(end_row),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}:{}",
            quote_tab(&self.tab),
            column_letter(self.start_column),
            self.start_row,
            column_letter(self.end_column)
        )?;
        if let Some(end_row) = self.end_row {
            write!(f, "{}", end_row)?;
        }
        Ok(())
    }
}
