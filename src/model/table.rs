//! Table types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A detected table: rows of text cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in reading order (top to bottom).
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, based on the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tab-separated plain text representation, one line per row.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.cells.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Cell text, one entry per column.
    pub cells: Vec<String>,
}

impl TableRow {
    /// Create a row from cell values.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Create a row from string-like values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(Into::into).collect())
    }
}

/// A detected table together with its sequence number and the CSV file
/// it was persisted to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table sequence number (1-indexed, in detection order).
    pub number: u32,

    /// The tabular data.
    pub table: Table,

    /// Path of the CSV file written for this table.
    pub csv_path: PathBuf,
}

impl TableRecord {
    /// The deterministic CSV file name for a table sequence number.
    pub fn csv_file_name(number: u32) -> String {
        format!("table_{}.csv", number)
    }
}
