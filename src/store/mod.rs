pub mod connection;
pub mod memory;
pub mod setup;
pub mod sqlite;

use std::collections::HashMap;

use crate::errors::StoreError;

pub use connection::{DbConn, DbPool, create_pool, get_connection};
pub use memory::MemorySheet;
pub use sqlite::SqliteSheet;

/// One data row keyed by header column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    /// Pair header names with values; missing trailing cells read as blank
    pub fn from_values(header: &[String], values: &[String]) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(idx, name)| {
                let value = values.get(idx).cloned().unwrap_or_default();
                (name.clone(), value)
            })
            .collect();
        Self { cells }
    }

    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|value| value.trim().is_empty())
    }
}

/// Row-level access to one worksheet.
///
/// Rows and columns are 1-based and physical: row 1 is the header row,
/// column 1 is the first header cell.
pub trait TabularStore {
    /// Every row below the header, in sheet order, blank rows included
    fn read_all(&self) -> Result<Vec<Row>, StoreError>;

    fn read_header(&self) -> Result<Vec<String>, StoreError>;

    fn read_cell(&self, row: usize, col: usize) -> Result<String, StoreError>;

    fn write_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), StoreError>;

    fn append_row(&mut self, values: &[String]) -> Result<(), StoreError>;
}
