//! SQLite table gateway
//!
//! Builds parameterized statements from row payloads and predicates and runs
//! them on a sqlx connection pool. Table and column names are validated before
//! they are spliced into SQL; every value is bound as a parameter.

use super::TableGateway;
use crate::error::{FhskError, Result};
use crate::predicate::{Predicate, RowData};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqliteRow};
use sqlx::{Column, Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Table gateway over a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteTableGateway {
    pool: SqlitePool,
    table: String,
}

impl SqliteTableGateway {
    /// Connect to `database_url` (e.g. `sqlite:./data/fhsk.db`), creating the file if missing
    pub async fn new(database_url: &str, table: impl Into<String>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| FhskError::storage(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| FhskError::storage(format!("Failed to connect to SQLite: {}", e)))?;

        Self::from_pool(pool, table)
    }

    /// Gateway over an existing pool
    pub fn from_pool(pool: SqlitePool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        check_identifier(&table)?;
        Ok(Self { pool, table })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn where_clause(predicate: &Predicate) -> Result<String> {
        if predicate.is_empty() {
            return Ok(String::new());
        }

        let conditions = predicate
            .conditions()
            .iter()
            .map(|(column, _)| Ok(format!("{} = ?", quote(column)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(" WHERE {}", conditions.join(" AND ")))
    }
}

#[async_trait]
impl TableGateway for SqliteTableGateway {
    fn table(&self) -> &str {
        &self.table
    }

    async fn select(&self, predicate: Option<&Predicate>) -> Result<Vec<RowData>> {
        let sql = match predicate {
            Some(p) => format!("SELECT * FROM {}{}", quote(&self.table)?, Self::where_clause(p)?),
            None => format!("SELECT * FROM {}", quote(&self.table)?),
        };

        let params: Vec<Value> = predicate
            .map(|p| p.conditions().iter().map(|(_, v)| v.clone()).collect())
            .unwrap_or_default();

        self.query(&sql, &params).await
    }

    async fn insert(&self, values: RowData) -> Result<i64> {
        let table = quote(&self.table)?;

        let sql = if values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let columns = values
                .keys()
                .map(|c| quote(c))
                .collect::<Result<Vec<_>>>()?;
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                placeholders
            )
        };

        debug!(table = %self.table, "insert");

        let mut query = sqlx::query(&sql);
        for value in values.values() {
            query = bind_value(query, value);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| FhskError::storage(format!("Failed to insert into {}: {}", self.table, e)))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, values: RowData, predicate: &Predicate) -> Result<u64> {
        if values.is_empty() {
            return Ok(0);
        }

        let assignments = values
            .keys()
            .map(|c| Ok(format!("{} = ?", quote(c)?)))
            .collect::<Result<Vec<_>>>()?;
        let sql = format!(
            "UPDATE {} SET {}{}",
            quote(&self.table)?,
            assignments.join(", "),
            Self::where_clause(predicate)?
        );

        debug!(table = %self.table, "update");

        let mut query = sqlx::query(&sql);
        for value in values.values() {
            query = bind_value(query, value);
        }
        for (_, value) in predicate.conditions() {
            query = bind_value(query, value);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| FhskError::storage(format!("Failed to update {}: {}", self.table, e)))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, predicate: &Predicate) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {}{}",
            quote(&self.table)?,
            Self::where_clause(predicate)?
        );
        let params: Vec<Value> = predicate.conditions().iter().map(|(_, v)| v.clone()).collect();

        debug!(table = %self.table, "delete");

        self.execute(&sql, &params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>> {
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| FhskError::storage(format!("Failed to query {}: {}", self.table, e)))?;

        Ok(rows.iter().map(decode_row).collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| FhskError::storage(format!("Failed to execute on {}: {}", self.table, e)))?;

        Ok(result.rows_affected())
    }
}

fn check_identifier(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(FhskError::InvalidIdentifier(name.to_string()))
    }
}

fn quote(name: &str) -> Result<String> {
    check_identifier(name)?;
    Ok(format!("\"{}\"", name))
}

fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => query.bind(s.clone()),
        // nested values are stored as JSON text
        Value::Array(_) | Value::Object(_) => query.bind(value.to_string()),
    }
}

fn decode_row(row: &SqliteRow) -> RowData {
    let mut data = RowData::new();

    for column in row.columns() {
        let index = column.ordinal();
        let value = if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
            v.map_or(Value::Null, Value::from)
        } else if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
            v.map_or(Value::Null, Value::from)
        } else if let Ok(v) = row.try_get::<Option<String>, _>(index) {
            v.map_or(Value::Null, Value::from)
        } else {
            Value::Null
        };

        data.insert(column.name().to_string(), value);
    }

    data
}
