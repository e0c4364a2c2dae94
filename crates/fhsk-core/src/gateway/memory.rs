//! In-memory table gateway for testing and development

use super::TableGateway;
use crate::error::{FhskError, Result};
use crate::predicate::{Predicate, RowData, as_integer};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Rows {
    by_key: BTreeMap<i64, RowData>,
    last_key: i64,
}

/// Table held in process memory, keyed by an auto-incrementing integer column
#[derive(Debug)]
pub struct MemoryTableGateway {
    table: String,
    primary_key: String,
    rows: Mutex<Rows>,
}

impl MemoryTableGateway {
    /// Create an empty table whose primary key column is `id`
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_primary_key(table, "id")
    }

    pub fn with_primary_key(table: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            rows: Mutex::new(Rows::default()),
        }
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.lock().map(|rows| rows.by_key.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every row; key generation continues where it left off
    pub fn clear(&self) {
        if let Ok(mut rows) = self.lock() {
            rows.by_key.clear();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows>> {
        self.rows
            .lock()
            .map_err(|_| FhskError::storage("Lock poisoned"))
    }

    fn matching_keys(rows: &Rows, predicate: &Predicate) -> Vec<i64> {
        rows.by_key
            .iter()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(key, _)| *key)
            .collect()
    }
}

#[async_trait]
impl TableGateway for MemoryTableGateway {
    fn table(&self) -> &str {
        &self.table
    }

    async fn select(&self, predicate: Option<&Predicate>) -> Result<Vec<RowData>> {
        let rows = self.lock()?;

        Ok(rows
            .by_key
            .values()
            .filter(|row| predicate.is_none_or(|p| p.matches(row)))
            .cloned()
            .collect())
    }

    async fn insert(&self, mut values: RowData) -> Result<i64> {
        let mut rows = self.lock()?;

        let key = match values.get(&self.primary_key) {
            None | Some(Value::Null) => rows.last_key.checked_add(1).ok_or_else(|| {
                FhskError::storage(format!("Key space of table {} is exhausted", self.table))
            })?,
            Some(value) => as_integer(value).ok_or_else(|| {
                FhskError::invalid_row(format!("{} must be an integer", self.primary_key))
            })?,
        };

        if rows.by_key.contains_key(&key) {
            return Err(FhskError::storage(format!(
                "Duplicate key {} in table {}",
                key, self.table
            )));
        }

        debug!(table = %self.table, key, "insert");
        values.insert(self.primary_key.clone(), Value::from(key));
        rows.by_key.insert(key, values);
        rows.last_key = rows.last_key.max(key);

        Ok(key)
    }

    async fn update(&self, values: RowData, predicate: &Predicate) -> Result<u64> {
        if values.contains_key(&self.primary_key) {
            return Err(FhskError::Unsupported(format!(
                "updating primary key {} of table {}",
                self.primary_key, self.table
            )));
        }

        debug!(table = %self.table, "update");
        let mut rows = self.lock()?;
        let keys = Self::matching_keys(&rows, predicate);

        for key in &keys {
            if let Some(row) = rows.by_key.get_mut(key) {
                for (column, value) in &values {
                    row.insert(column.clone(), value.clone());
                }
            }
        }

        Ok(keys.len() as u64)
    }

    async fn delete(&self, predicate: &Predicate) -> Result<u64> {
        debug!(table = %self.table, "delete");
        let mut rows = self.lock()?;
        let keys = Self::matching_keys(&rows, predicate);

        for key in &keys {
            rows.by_key.remove(key);
        }

        Ok(keys.len() as u64)
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> Result<Vec<RowData>> {
        Err(FhskError::Unsupported(format!(
            "raw SQL against in-memory table {}",
            self.table
        )))
    }

    async fn execute(&self, _sql: &str, _params: &[Value]) -> Result<u64> {
        Err(FhskError::Unsupported(format!(
            "raw SQL against in-memory table {}",
            self.table
        )))
    }
}
