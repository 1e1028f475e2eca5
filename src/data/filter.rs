// ---------------------------------------------------------------------------
// Row cleansing: which coerced rows survive
// ---------------------------------------------------------------------------

/// One data row after numeric coercion; `None` marks a missing cell.
pub type CoercedRow = Vec<Option<f64>>;

/// Whether a row survives cleansing.
///
/// A row passes when:
/// * it has exactly `width` cells, and
/// * none of them (time column included) is missing.
pub fn is_complete(row: &CoercedRow, width: usize) -> bool {
    row.len() == width && row.iter().all(Option::is_some)
}

/// Keep only complete rows, unwrapping their cells. Partial rows are never
/// kept, whichever column the gap is in.
pub fn drop_incomplete(rows: Vec<CoercedRow>, width: usize) -> Vec<Vec<f64>> {
    rows.into_iter()
        .filter(|row| is_complete(row, width))
        .filter_map(|row| row.into_iter().collect::<Option<Vec<f64>>>())
        .collect()
}
