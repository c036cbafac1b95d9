//! In-memory tabular store for unit tests

use crate::sheets::{CellRange, StoreError, TableRegion, TabularStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Tabs of rows, where index 0 is sheet row 1
#[derive(Default)]
pub struct MockStore {
    pub tabs: Mutex<HashMap<String, Vec<Vec<String>>>>,
    /// Writes whose first cell is one of these keys fail
    pub failing_keys: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn with_rows(self, tab: &str, first_row: u32, rows: &[&[&str]]) -> Self {
        {
            let mut tabs = self.tabs.lock().unwrap();
            let grid = tabs.entry(tab.to_string()).or_default();
            for (i, row) in rows.iter().enumerate() {
                let index = first_row as usize - 1 + i;
                if grid.len() <= index {
                    grid.resize(index + 1, Vec::new());
                }
                grid[index] = row.iter().map(|c| c.to_string()).collect();
            }
        }
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    /// Rows of `tab` with trailing empty cells removed
    pub fn rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.tabs
            .lock()
            .unwrap()
            .get(tab)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(trim_row)
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, rows: &[Vec<String>]) -> Result<(), StoreError> {
        match rows.iter().find_map(|r| r.first().filter(|k| self.failing_keys.contains(*k))) {
            Some(key) => Err(StoreError::Api {
                status: 500,
                message: format!("write of {} rejected", key),
            }),
            None => Ok(()),
        }
    }
}

fn trim_row(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

fn put_cells(grid: &mut Vec<Vec<String>>, index: usize, start_column: usize, cells: &[String]) {
    if grid.len() <= index {
        grid.resize(index + 1, Vec::new());
    }
    let row = &mut grid[index];
    if row.len() < start_column + cells.len() {
        row.resize(start_column + cells.len(), String::new());
    }
    row[start_column..start_column + cells.len()].clone_from_slice(cells);
}

#[async_trait]
impl TabularStore for MockStore {
    async fn read_range(
        &self,
        _region: &TableRegion,
        range: &CellRange,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        self.calls.lock().unwrap().push(format!("read {}", range));
        let tabs = self.tabs.lock().unwrap();
        let grid = tabs.get(&range.tab).cloned().unwrap_or_default();

        let start = range.start_row as usize - 1;
        let end = range
            .end_row
            .map(|r| r as usize)
            .unwrap_or(grid.len())
            .min(grid.len());

        let mut rows: Vec<Vec<String>> = (start..end)
            .map(|i| {
                let row = &grid[i];
                let cells = row
                    .iter()
                    .skip(range.start_column)
                    .take(range.end_column + 1 - range.start_column)
                    .cloned()
                    .collect();
                trim_row(cells)
            })
            .collect();
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
        self.calls.lock().unwrap().push(format!("write {}", range));
        self.check(rows)?;
        let mut tabs = self.tabs.lock().unwrap();
        let grid = tabs.entry(range.tab.clone()).or_default();
        for (i, row) in rows.iter().enumerate() {
            put_cells(grid, range.start_row as usize - 1 + i, range.start_column, row);
        }
        Ok(())
    }

    async fn append_rows(
        &self,
        _region: &TableRegion,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(format!("append {}", range));
        self.check(rows)?;
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
        self.calls.lock().unwrap().push(format!("clear {}", range));
        let mut tabs = self.tabs.lock().unwrap();
        if let Some(grid) = tabs.get_mut(&range.tab) {
            let start = range.start_row as usize - 1;
            let end = range.end_row.map(|r| r as usize).unwrap_or(grid.len()).min(grid.len());
            for row in grid.iter_mut().take(end).skip(start) {
                for cell in row
                    .iter_mut()
                    .skip(range.start_column)
                    .take(range.end_column + 1 - range.start_column)
                {
                    cell.clear();
                }
            }
        }
        Ok(())
    }
}
