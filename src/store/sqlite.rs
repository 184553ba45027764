use std::collections::BTreeMap;

use rusqlite::{OptionalExtension, params};

use super::connection::DbPool;
use super::{Row, TabularStore};
use crate::errors::StoreError;

/// A worksheet stored as sparse cells in a SQLite document
#[derive(Clone)]
pub struct SqliteSheet {
    pool: DbPool,
    sheet: String,
}

impl SqliteSheet {
    /// Open `sheet` inside the document behind `pool`
    pub fn open(pool: DbPool, sheet: &str) -> Result<Self, StoreError> {
        let opened = Self {
            pool,
            sheet: sheet.to_string(),
        };
        opened.ensure_exists()?;
        Ok(opened)
    }

    /// The worksheet may be removed or renamed while the bot runs
    fn ensure_exists(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        let found = conn
            .query_row(
                "SELECT name FROM worksheets WHERE name = ?1",
                params![self.sheet],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        if found.is_some() {
            return Ok(());
        }

        let mut stmt = conn.prepare("SELECT name FROM worksheets ORDER BY created_at, name")?;
        let available = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Err(StoreError::SheetNotFound {
            sheet: self.sheet.clone(),
            available,
        })
    }

    /// All cells of the sheet grouped by row, each row ordered by column
    fn load_grid(&self) -> Result<BTreeMap<usize, BTreeMap<usize, String>>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT row_number, column_number, value FROM cells WHERE sheet = ?1 ORDER BY row_number, column_number",
        )?;
        let cells = stmt
            .query_map(params![self.sheet], |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, i64>(1)? as usize,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut grid: BTreeMap<usize, BTreeMap<usize, String>> = BTreeMap::new();
        for (row, col, value) in cells {
            grid.entry(row).or_default().insert(col, value);
        }
        Ok(grid)
    }

    fn last_row(&self) -> Result<usize, StoreError> {
        let conn = self.pool.get()?;
        let last: Option<i64> = conn.query_row(
            "SELECT MAX(row_number) FROM cells WHERE sheet = ?1 AND value <> ''",
            params![self.sheet],
            |row| row.get(0),
        )?;
        Ok(last.unwrap_or(0) as usize)
    }
}

fn row_values(cells: Option<&BTreeMap<usize, String>>, width: usize) -> Vec<String> {
    (1..=width)
        .map(|col| {
            cells
                .and_then(|row| row.get(&col))
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

impl TabularStore for SqliteSheet {
    fn read_all(&self) -> Result<Vec<Row>, StoreError> {
        self.ensure_exists()?;
        let grid = self.load_grid()?;
        let width = grid
            .get(&1)
            .and_then(|row| row.keys().next_back().copied())
            .unwrap_or(0);
        let header = trim_trailing_blanks(row_values(grid.get(&1), width));
        let last_row = grid.keys().next_back().copied().unwrap_or(1);

        let rows = (2..=last_row)
            .map(|row| Row::from_values(&header, &row_values(grid.get(&row), header.len())))
            .collect();
        Ok(rows)
    }

    fn read_header(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_exists()?;
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT column_number, value FROM cells WHERE sheet = ?1 AND row_number = 1 ORDER BY column_number",
        )?;
        let cells = stmt
            .query_map(params![self.sheet], |row| {
                Ok((row.get::<_, i64>(0)? as usize, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;

        let width = cells.keys().next_back().copied().unwrap_or(0);
        Ok(trim_trailing_blanks(row_values(Some(&cells), width)))
    }

    fn read_cell(&self, row: usize, col: usize) -> Result<String, StoreError> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row(
                "SELECT value FROM cells WHERE sheet = ?1 AND row_number = ?2 AND column_number = ?3",
                params![self.sheet, row as i64, col as i64],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(value.unwrap_or_default())
    }

    fn write_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO cells (sheet, row_number, column_number, value) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(sheet, row_number, column_number) DO UPDATE SET value = excluded.value",
            params![self.sheet, row as i64, col as i64, value],
        )?;
        log::debug!("{}!R{}C{} <- {:?}", self.sheet, row, col, value);
        Ok(())
    }

    fn append_row(&mut self, values: &[String]) -> Result<(), StoreError> {
        let row = self.last_row()? + 1;
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        for (idx, value) in values.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            tx.execute(
                "INSERT INTO cells (sheet, row_number, column_number, value) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(sheet, row_number, column_number) DO UPDATE SET value = excluded.value",
                params![self.sheet, row as i64, (idx + 1) as i64, value],
            )?;
        }
        tx.commit()?;
        log::debug!("{}: appended row {}", self.sheet, row);
        Ok(())
    }
}

fn trim_trailing_blanks(mut header: Vec<String>) -> Vec<String> {
    while header.last().is_some_and(|name| name.trim().is_empty()) {
        header.pop();
    }
    header
}
