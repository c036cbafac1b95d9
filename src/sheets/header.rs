use crate::sheets::{CellRange, StoreError, TableRegion, TabularStore};

/// How far down a tab the header literal is searched for
pub const HEADER_SEARCH_ROWS: u32 = 100;

/// Sheet row (1-based) of the first cell in `column` equal to `header`,
/// ignoring case and surrounding whitespace
pub fn find_header_row(column: &[Vec<String>], header: &str, first_row: u32) -> Option<u32> {
    let wanted = header.trim().to_lowercase();
    column.iter().enumerate().find_map(|(i, row)| {
        row.first()
            .filter(|cell| cell.trim().to_lowercase() == wanted)
            .map(|_| first_row + i as u32)
    })
}

/// Look for `header` in the region's key column within the first
/// [`HEADER_SEARCH_ROWS`] rows
pub async fn locate_header(
    store: &dyn TabularStore,
    region: &TableRegion,
    header: &str,
) -> Result<Option<u32>, StoreError> {
    let range = CellRange::column(&region.tab_name, region.key_column, 1, HEADER_SEARCH_ROWS);
    let column = store.read_range(region, &range).await?;
    Ok(find_header_row(&column, header, 1))
}

/// Move `region` so its data starts right below the header row.
///
/// The header is found by its first cell. When it is missing, `header` is
/// written as a row at the region's `last_header_row` and the region keeps
/// its configured layout.
pub async fn anchor_region(
    store: &dyn TabularStore,
    region: TableRegion,
    header: &[&str],
) -> Result<TableRegion, StoreError> {
    let Some(label) = header.first() else {
        return Ok(region);
    };

    if let Some(row) = locate_header(store, &region, label).await? {
        tracing::debug!(tab = %region.tab_name, row, header = %label, "Found header row");
        return Ok(region.with_header_at(row));
    }

    let row = region.last_header_row;
    let range = CellRange {
        tab: region.tab_name.clone(),
        start_column: region.key_column,
        end_column: region.key_column + header.len() - 1,
        start_row: row,
        end_row: Some(row),
    };
    let cells: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    store.write_range(&region, &range, &[cells]).await?;

    tracing::info!(
        tab = %region.tab_name,
        row,
        header = %label,
        "Header not found, wrote it"
    );
    Ok(region.with_header_at(row))
}
