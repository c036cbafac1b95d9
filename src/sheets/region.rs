use crate::sheets::CellRange;

/// Where a table lives in the spreadsheet. Rows are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    pub sheet_id: String,
    pub tab_name: String,
    /// Zero-based column holding each row's natural key
    pub key_column: usize,
    pub first_data_row: u32,
    pub last_header_row: u32,
    /// Columns written per row
    pub width: usize,
}

impl TableRegion {
    /// A table with a single header row on row 1
    pub fn new(sheet_id: impl Into<String>, tab_name: impl Into<String>, width: usize) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            tab_name: tab_name.into(),
            key_column: 0,
            first_data_row: 2,
            last_header_row: 1,
            width,
        }
    }

    /// Move the table so its header sits on `header_row` and data starts below
    pub fn with_header_at(mut self, header_row: u32) -> Self {
        self.last_header_row = header_row;
        self.first_data_row = header_row + 1;
        self
    }

    /// Sheet row holding the `index`-th data row
    pub fn row_number(&self, index: usize) -> u32 {
        self.first_data_row + index as u32
    }

    pub fn data_range(&self) -> CellRange {
        CellRange::rows_from(&self.tab_name, self.first_data_row, self.width)
    }

    pub fn row_range(&self, row: u32) -> CellRange {
        CellRange::row(&self.tab_name, row, self.width)
    }

    pub fn header_range(&self) -> CellRange {
        self.row_range(self.last_header_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let region = TableRegion::new("sheet", "digests", 4);
        assert_eq!(region.row_number(0), 2);
        assert_eq!(region.data_range().to_string(), "'digests'!A2:D");
        assert_eq!(region.header_range().to_string(), "'digests'!A1:D1");
    }

    #[test]
    fn test_header_anchor_moves_data() {
        let region = TableRegion::new("sheet", "project summary", 4).with_header_at(27);
        assert_eq!(region.first_data_row, 28);
        assert_eq!(region.row_number(2), 30);
        assert_eq!(region.row_range(30).to_string(), "'project summary'!A30:D30");
    }
}
