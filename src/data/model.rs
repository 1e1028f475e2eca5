use std::fmt;

// ---------------------------------------------------------------------------
// Column – one named series of the cleaned table
// ---------------------------------------------------------------------------

/// A named column of finite samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// SignalTable – the cleaned, all-numeric table
// ---------------------------------------------------------------------------

/// The cleaned table produced by ingestion.
///
/// Column 0 is the time axis, every other column is a channel. All columns
/// have the same length and every cell is finite. The table is never mutated
/// after loading; a new file produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    columns: Vec<Column>,
}

impl SignalTable {
    /// Build a table from column names and row-major records.
    ///
    /// Rows must already be complete and as wide as `names`.
    pub fn from_rows(names: Vec<String>, rows: &[Vec<f64>]) -> Self {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(j, name)| Column {
                name,
                values: rows.iter().map(|row| row[j]).collect(),
            })
            .collect();
        SignalTable { columns }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in file order, time column included.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The time axis (column 0).
    pub fn time(&self) -> &[f64] {
        self.columns
            .first()
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// Number of non-time columns.
    pub fn num_channels(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Channel `index` counts from the first column after time.
    pub fn channel(&self, index: usize) -> Option<&Column> {
        self.columns.get(index + 1)
    }
}

// ---------------------------------------------------------------------------
// LoadedSignal – table plus its derived sampling rate
// ---------------------------------------------------------------------------

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSignal {
    pub table: SignalTable,
    /// Samples per time unit, `0.0` when the time step is degenerate.
    pub sampling_rate: f64,
    /// Zero-based line of the source file used as the header.
    pub header_line: usize,
}

impl fmt::Display for LoadedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows × {} columns, fs = {:.4}",
            self.table.len(),
            self.table.num_columns(),
            self.sampling_rate
        )
    }
}
