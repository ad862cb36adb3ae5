//! SQLite storage for accepted vehicle records.
//!
//! Records land in a single `vehicles` table: an `id`, one text column per
//! flattened record field, the category fields as a JSON object and the
//! `suspicious` flag. A VIN that is already stored marks both the earlier
//! rows and the new one as suspicious, across every run that shares the
//! database file.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, params, params_from_iter};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::record::VehicleRecord;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Id and duplicate flag assigned to a newly stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredVehicle {
    pub id: i64,
    pub suspicious: bool,
}

/// One row of the `vehicles` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: i64,
    /// Flattened record columns, then `cat_*` columns in key order.
    pub columns: Vec<(String, String)>,
    pub suspicious: bool,
}

impl StoredRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }
}

/// Persistent vehicle table.
pub struct VehicleStore {
    conn: Connection,
    columns: Vec<String>,
}

impl std::fmt::Debug for VehicleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl VehicleStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!("Opened vehicle store {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let columns = record_columns();
        let column_defs: String = columns
            .iter()
            .map(|c| format!("            {} TEXT NOT NULL DEFAULT '',\n", c))
            .collect();
        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS vehicles (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
{}            category_fields TEXT NOT NULL DEFAULT '{{}}',
            suspicious      INTEGER NOT NULL DEFAULT 0,
            stored_at       TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_vehicles_vin ON vehicles(vin);
            ",
            column_defs
        ))?;
        Ok(Self { conn, columns })
    }

    /// Store one record.
    pub fn insert(&self, record: &VehicleRecord) -> Result<StoredVehicle> {
        let tx = self.conn.unchecked_transaction()?;
        let stored = insert_row(&tx, &self.columns, record)?;
        tx.commit()?;
        Ok(stored)
    }

    /// Store records in order within one transaction.
    pub fn insert_all<'a>(
        &self,
        records: impl IntoIterator<Item = &'a VehicleRecord>,
    ) -> Result<Vec<StoredVehicle>> {
        let tx = self.conn.unchecked_transaction()?;
        let stored = records
            .into_iter()
            .map(|record| insert_row(&tx, &self.columns, record))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(stored)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vehicles", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Every stored row in id order.
    pub fn rows(&self) -> Result<Vec<StoredRow>> {
        let sql = format!(
            "SELECT id, {}, category_fields, suspicious FROM vehicles ORDER BY id",
            self.columns.join(", ")
        );
        let width = self.columns.len();
        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map([], |r| {
                let id: i64 = r.get(0)?;
                let values = (1..=width)
                    .map(|i| r.get::<_, String>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                let category: String = r.get(width + 1)?;
                let suspicious: bool = r.get(width + 2)?;
                Ok((id, values, category, suspicious))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(id, values, category, suspicious)| {
                let category: BTreeMap<String, String> = serde_json::from_str(&category)?;
                let mut columns: Vec<(String, String)> =
                    self.columns.iter().cloned().zip(values).collect();
                columns.extend(category.into_iter().map(|(k, v)| (format!("cat_{}", k), v)));
                Ok(StoredRow { id, columns, suspicious })
            })
            .collect()
    }
}

/// Fixed flattened record columns, in table order.
fn record_columns() -> Vec<String> {
    VehicleRecord::new()
        .flatten()
        .into_iter()
        .map(|(k, _)| k)
        .filter(|k| !k.starts_with("cat_"))
        .collect()
}

fn insert_row(conn: &Connection, columns: &[String], record: &VehicleRecord) -> Result<StoredVehicle> {
    let vin = record.vin.trim();
    let earlier: i64 = if vin.is_empty() {
        0
    } else {
        conn.query_row(
            "SELECT COUNT(*) FROM vehicles WHERE vin = ?1",
            params![vin],
            |r| r.get(0),
        )?
    };
    let suspicious = earlier > 0;
    if suspicious {
        warn!("VIN {} already stored {} time(s), flagging as suspicious", vin, earlier);
        conn.execute("UPDATE vehicles SET suspicious = 1 WHERE vin = ?1", params![vin])?;
    }

    let flattened: BTreeMap<String, String> = record.flatten().into_iter().collect();
    let mut values: Vec<String> = columns
        .iter()
        .map(|c| match c.as_str() {
            "vin" => vin.to_string(),
            _ => flattened.get(c).cloned().unwrap_or_default(),
        })
        .collect();
    values.push(serde_json::to_string(&record.category_fields)?);

    let sql = format!(
        "INSERT INTO vehicles ({}, category_fields, suspicious) VALUES ({}, {})",
        columns.join(", "),
        (1..=values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", "),
        i32::from(suspicious)
    );
    conn.execute(&sql, params_from_iter(values.iter()))?;

    Ok(StoredVehicle {
        id: conn.last_insert_rowid(),
        suspicious,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(vin: &str, category: &[(&str, &str)]) -> VehicleRecord {
        VehicleRecord {
            brand: "VOLVO".to_string(),
            vin: vin.to_string(),
            year: "2019".to_string(),
            temperature: Some(18.5),
            category_fields: category
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..VehicleRecord::new()
        }
    }

    #[test]
    fn test_ids_and_columns() {
        let store = VehicleStore::open_in_memory().unwrap();
        assert!(store.is_empty().unwrap());

        let stored = store
            .insert_all([&record("A1", &[("payload", "11150")]), &record("B2", &[])])
            .unwrap();
        assert_eq!(stored.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);

        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("brand"), Some("VOLVO"));
        assert_eq!(rows[0].get("temperature"), Some("18.5"));
        assert_eq!(rows[0].get("cat_payload"), Some("11150"));
        assert_eq!(rows[1].get("cat_payload"), None);
        assert!(rows.iter().all(|r| !r.suspicious));
    }

    #[test]
    fn test_duplicate_vin_flags_earlier_rows() {
        let store = VehicleStore::open_in_memory().unwrap();
        let first = store.insert(&record("A1", &[])).unwrap();
        let other = store.insert(&record("B2", &[])).unwrap();
        let second = store.insert(&record("A1", &[])).unwrap();

        assert!(!first.suspicious);
        assert!(!other.suspicious);
        assert!(second.suspicious);

        let flags: Vec<(i64, bool)> = store
            .rows()
            .unwrap()
            .iter()
            .map(|r| (r.id, r.suspicious))
            .collect();
        assert_eq!(flags, vec![(1, true), (2, false), (3, true)]);
    }

    #[test]
    fn test_empty_vin_never_suspicious() {
        let store = VehicleStore::open_in_memory().unwrap();
        store.insert(&record("", &[])).unwrap();
        let again = store.insert(&record("  ", &[])).unwrap();

        assert!(!again.suspicious);
        assert!(store.rows().unwrap().iter().all(|r| !r.suspicious));
    }

    #[test]
    fn test_duplicates_detected_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles.db");

        VehicleStore::open(&path)
            .unwrap()
            .insert(&record("YV2RT40A5KB123456", &[]))
            .unwrap();

        let store = VehicleStore::open(&path).unwrap();
        let stored = store.insert(&record("YV2RT40A5KB123456", &[])).unwrap();

        assert_eq!(stored.id, 2);
        assert!(stored.suspicious);
        assert_eq!(store.len().unwrap(), 2);
        assert!(store.rows().unwrap().iter().all(|r| r.suspicious));
    }
}
