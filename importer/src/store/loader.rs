//! Transactional bulk load into `productos`.

use rusqlite::{params, Connection};
use serde::Serialize;

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::logs::{log_error, log_info, log_success};
use crate::models::CanonicalRecord;

const INSERT_SQL: &str = "INSERT INTO productos
    (codigo_barras, nombre, descripcion, descripcion_empaque, color, cantidad, almacen, image_path)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const INDEX_SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_codigo_barras ON productos(codigo_barras);
CREATE INDEX IF NOT EXISTS idx_almacen ON productos(almacen);
";

/// Committed rows for one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionCount {
    pub partition: String,
    pub count: usize,
}

/// What the store holds after a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    pub row_count: usize,
    /// Largest partition first, ties by name.
    pub partitions: Vec<PartitionCount>,
}

/// Insert every record in one transaction, then build the secondary indexes.
///
/// Any failure rolls the whole batch back: the table is left exactly as it
/// was before the call.
pub fn load(store: &mut Store, records: &[CanonicalRecord]) -> StoreResult<LoadResult> {
    log_info(format!("Importing {} records...", records.len()));

    let tx = store.connection_mut().transaction()?;
    {
        let mut stmt = tx.prepare(INSERT_SQL)?;
        for (idx, record) in records.iter().enumerate() {
            stmt.execute(params![
                record.natural_key,
                record.display_name,
                record.description,
                record.package_description,
                record.color,
                record.quantity,
                record.partition,
                record.asset_path,
            ])
            .map_err(|source| {
                log_error(format!(
                    "Insert failed for '{}', rolling back",
                    record.natural_key
                ));
                StoreError::LoadAborted {
                    row: idx + 1,
                    natural_key: record.natural_key.clone(),
                    source,
                }
            })?;
        }
    }
    tx.execute_batch(INDEX_SQL)?;
    tx.commit()?;

    let conn = store.connection();
    let result = LoadResult {
        row_count: row_count(conn)?,
        partitions: partition_counts(conn)?,
    };
    log_success(format!("Committed {} rows", result.row_count));
    Ok(result)
}

/// Rows currently in `productos`.
pub fn row_count(conn: &Connection) -> StoreResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM productos", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Rows per partition, largest first.
pub fn partition_counts(conn: &Connection) -> StoreResult<Vec<PartitionCount>> {
    let mut stmt = conn.prepare(
        "SELECT almacen, COUNT(*) AS n FROM productos
         GROUP BY almacen
         ORDER BY n DESC, almacen ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(PartitionCount {
            partition: row.get(0)?,
            count: row.get::<_, i64>(1)? as usize,
        })
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}
