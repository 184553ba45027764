use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;

/// Create the worksheet tables if this document has never been used
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::debug!("Sheet schema ready");
    Ok(())
}

/// Create `sheet` with `header` as its first row. Returns false when the
/// worksheet already exists; its contents are left untouched.
pub fn create_worksheet(conn: &mut DbConn, sheet: &str, header: &[String]) -> Result<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM worksheets WHERE name = ?1",
            params![sheet],
            |_| Ok(()),
        )
        .optional()
        .context("Failed to look up worksheet")?
        .is_some();

    if exists {
        log::info!("Worksheet '{}' already exists", sheet);
        return Ok(false);
    }

    let tx = conn.transaction().context("Failed to start transaction")?;
    tx.execute("INSERT INTO worksheets (name) VALUES (?1)", params![sheet])
        .context("Failed to register worksheet")?;
    for (idx, column) in header.iter().enumerate() {
        tx.execute(
            "INSERT INTO cells (sheet, row_number, column_number, value) VALUES (?1, 1, ?2, ?3)",
            params![sheet, (idx + 1) as i64, column],
        )
        .context("Failed to write header cell")?;
    }
    tx.commit().context("Failed to commit worksheet creation")?;

    log::info!("Created worksheet '{}' with {} columns", sheet, header.len());
    Ok(true)
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connection::{create_memory_pool, get_connection};

    #[test]
    fn test_schema_statements_are_split() {
        let statements = split_sql_statements(include_str!("schema.sql"));
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn test_create_worksheet_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        let header = vec!["Id".to_string(), "Nome".to_string()];
        assert!(create_worksheet(&mut conn, "Pessoas", &header).unwrap());
        assert!(!create_worksheet(&mut conn, "Pessoas", &header).unwrap());

        let cells: i64 = conn
            .query_row("SELECT COUNT(*) FROM cells WHERE sheet = 'Pessoas'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(cells, 2);
    }
}
