use super::{Row, TabularStore};
use crate::errors::StoreError;

/// In-process worksheet: `grid[0]` is the header row
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    grid: Vec<Vec<String>>,
    writes: usize,
}

impl MemorySheet {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            grid: vec![header],
            writes: 0,
        }
    }

    pub fn with_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut sheet = Self::new(header);
        sheet.grid.extend(rows);
        sheet
    }

    /// Number of cell writes and row appends since creation
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Physical rows including the header
    pub fn rows(&self) -> &[Vec<String>] {
        &self.grid
    }

    fn header(&self) -> &[String] {
        self.grid.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl TabularStore for MemorySheet {
    fn read_all(&self) -> Result<Vec<Row>, StoreError> {
        let header = self.header();
        Ok(self
            .grid
            .iter()
            .skip(1)
            .map(|values| Row::from_values(header, values))
            .collect())
    }

    fn read_header(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.header().to_vec())
    }

    fn read_cell(&self, row: usize, col: usize) -> Result<String, StoreError> {
        Ok(self
            .grid
            .get(row.wrapping_sub(1))
            .and_then(|values| values.get(col.wrapping_sub(1)))
            .cloned()
            .unwrap_or_default())
    }

    fn write_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), StoreError> {
        if row == 0 || col == 0 {
            return Err(StoreError::Access(format!("invalid cell R{row}C{col}")));
        }
        if self.grid.len() < row {
            self.grid.resize(row, Vec::new());
        }
        let values = &mut self.grid[row - 1];
        if values.len() < col {
            values.resize(col, String::new());
        }
        values[col - 1] = value.to_string();
        self.writes += 1;
        Ok(())
    }

    fn append_row(&mut self, values: &[String]) -> Result<(), StoreError> {
        while self.grid.len() > 1 && self.grid.last().is_some_and(|row| is_blank(row)) {
            self.grid.pop();
        }
        self.grid.push(values.to_vec());
        self.writes += 1;
        Ok(())
    }
}

fn is_blank(values: &[String]) -> bool {
    values.iter().all(|value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        vec!["Id".to_string(), "Nome".to_string()]
    }

    #[test]
    fn test_write_cell_grows_grid_and_counts() {
        let mut sheet = MemorySheet::new(header());

        sheet.write_cell(3, 2, "Ana").unwrap();

        assert_eq!(sheet.rows().len(), 3);
        assert_eq!(sheet.read_cell(3, 2).unwrap(), "Ana");
        assert_eq!(sheet.read_cell(2, 1).unwrap(), "");
        assert_eq!(sheet.write_count(), 1);
    }

    #[test]
    fn test_append_skips_trailing_blank_rows() {
        let mut sheet = MemorySheet::with_rows(
            header(),
            vec![vec!["1".into(), "Ana".into()], vec![String::new(), String::new()]],
        );

        sheet.append_row(&["2".to_string(), "Bia".to_string()]).unwrap();

        assert_eq!(sheet.rows().len(), 3);
        assert_eq!(sheet.read_cell(3, 2).unwrap(), "Bia");
    }
}
