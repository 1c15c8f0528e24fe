//! In-process stand-in for the platform database.
//!
//! Rows are JSON objects. Every table is keyed by a natural key supplied by
//! the caller, so running the same seed routine twice updates rows in place
//! instead of inserting duplicates.
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("The database connection is closed")]
    Closed,

    #[error("The database connection is poisoned by an earlier panic")]
    Poisoned,

    #[error("Rows of table '{0}' must be JSON objects")]
    NotAnObject(String),
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Map<String, Value>>,
    /// Natural key to position in `rows`.
    keys: HashMap<String, usize>,
}

#[derive(Debug, Default)]
struct Store {
    tables: BTreeMap<String, Table>,
    closed: bool,
}

/// Shared handle to the store. Clones talk to the same tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
    inner: Arc<Mutex<Store>>,
}

impl Database {
    pub fn open() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, DbError> {
        let store = self.inner.lock().map_err(|_| DbError::Poisoned)?;

        if store.closed {
            return Err(DbError::Closed);
        }

        Ok(store)
    }

    /// Inserts `row` under `key`, or updates the fields of the existing row.
    ///
    /// Returns the stored row, including its `id`.
    pub fn upsert(&self, table: &str, key: &str, row: Value) -> Result<Value, DbError> {
        let Value::Object(fields) = row else {
            return Err(DbError::NotAnObject(table.to_string()));
        };

        let mut store = self.lock()?;
        let table = store.tables.entry(table.to_string()).or_default();

        let position = match table.keys.get(key) {
            Some(&position) => {
                let existing = &mut table.rows[position];
                for (field, value) in fields {
                    if field != "id" {
                        existing.insert(field, value);
                    }
                }
                position
            }
            None => {
                let position = table.rows.len();
                let mut fields = fields;
                fields.insert("id".into(), Value::from(position as u64 + 1));
                table.rows.push(fields);
                table.keys.insert(key.to_string(), position);
                position
            }
        };

        Ok(Value::Object(table.rows[position].clone()))
    }

    pub fn find(&self, table: &str, key: &str) -> Result<Option<Value>, DbError> {
        let store = self.lock()?;

        Ok(store.tables.get(table).and_then(|table| {
            table
                .keys
                .get(key)
                .map(|&position| Value::Object(table.rows[position].clone()))
        }))
    }

    /// Row counts per table, ordered by table name.
    pub fn counts(&self) -> Result<Vec<(String, usize)>, DbError> {
        let store = self.lock()?;

        Ok(store
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table.rows.len()))
            .collect())
    }

    /// Closes the connection for every clone of this handle.
    pub fn close(&self) -> Result<(), DbError> {
        let mut store = self.inner.lock().map_err(|_| DbError::Poisoned)?;
        store.closed = true;
        Ok(())
    }
}
