//! Table gateway abstraction
//!
//! A [`TableGateway`] offers select/insert/update/delete primitives against one
//! named table, parameterized by [`RowData`] payloads and [`Predicate`]s.
//! Repositories translate domain operations into these calls.

use crate::error::Result;
use crate::predicate::{Predicate, RowData};
use async_trait::async_trait;
use serde_json::Value;

pub mod memory;
pub mod recording;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryTableGateway;
pub use recording::{GatewayCall, RecordingTableGateway};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTableGateway;

/// Generic data access against a single table
#[async_trait]
pub trait TableGateway: Send + Sync {
    /// Name of the table this gateway reads and writes
    fn table(&self) -> &str;

    /// Fetch all rows, or only those matching `predicate`
    async fn select(&self, predicate: Option<&Predicate>) -> Result<Vec<RowData>>;

    /// Insert one row and return the generated primary key
    async fn insert(&self, values: RowData) -> Result<i64>;

    /// Overwrite `values` on every row matching `predicate`; returns rows affected
    async fn update(&self, values: RowData, predicate: &Predicate) -> Result<u64>;

    /// Delete every row matching `predicate`; returns rows affected
    async fn delete(&self, predicate: &Predicate) -> Result<u64>;

    /// Run a row-returning SQL statement
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>>;

    /// Run a SQL statement for its side effects; returns rows affected
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;
}
