//! Gateway decorator that records every call it forwards

use super::TableGateway;
use crate::error::{FhskError, Result};
use crate::predicate::{Predicate, RowData};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One call made against a [`TableGateway`]
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Select(Option<Predicate>),
    Insert(RowData),
    Update(RowData, Predicate),
    Delete(Predicate),
    Query(String, Vec<Value>),
    Execute(String, Vec<Value>),
}

/// Forwards to an inner gateway and keeps an ordered log of the calls
pub struct RecordingTableGateway {
    inner: Arc<dyn TableGateway>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl RecordingTableGateway {
    pub fn new(inner: Arc<dyn TableGateway>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls recorded so far, oldest first
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Forget the recorded calls
    pub fn reset(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, call: GatewayCall) -> Result<()> {
        self.calls
            .lock()
            .map_err(|_| FhskError::storage("Lock poisoned"))?
            .push(call);
        Ok(())
    }
}

#[async_trait]
impl TableGateway for RecordingTableGateway {
    fn table(&self) -> &str {
        self.inner.table()
    }

    async fn select(&self, predicate: Option<&Predicate>) -> Result<Vec<RowData>> {
        self.record(GatewayCall::Select(predicate.cloned()))?;
        self.inner.select(predicate).await
    }

    async fn insert(&self, values: RowData) -> Result<i64> {
        self.record(GatewayCall::Insert(values.clone()))?;
        self.inner.insert(values).await
    }

    async fn update(&self, values: RowData, predicate: &Predicate) -> Result<u64> {
        self.record(GatewayCall::Update(values.clone(), predicate.clone()))?;
        self.inner.update(values, predicate).await
    }

    async fn delete(&self, predicate: &Predicate) -> Result<u64> {
        self.record(GatewayCall::Delete(predicate.clone()))?;
        self.inner.delete(predicate).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>> {
        self.record(GatewayCall::Query(sql.to_string(), params.to_vec()))?;
        self.inner.query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(GatewayCall::Execute(sql.to_string(), params.to_vec()))?;
        self.inner.execute(sql, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryTableGateway;
    use serde_json::json;

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let gateway = RecordingTableGateway::new(Arc::new(MemoryTableGateway::new("page")));
        let values = json!({"title": "a"}).as_object().cloned().unwrap();

        gateway.insert(values.clone()).await.unwrap();
        gateway.select(Some(&Predicate::eq("id", 1))).await.unwrap();
        gateway.delete(&Predicate::eq("id", 1)).await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::Insert(values),
                GatewayCall::Select(Some(Predicate::eq("id", 1))),
                GatewayCall::Delete(Predicate::eq("id", 1)),
            ]
        );

        gateway.reset();
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_calls_are_still_recorded() {
        let gateway = RecordingTableGateway::new(Arc::new(MemoryTableGateway::new("page")));

        assert!(gateway.execute("DELETE FROM page", &[]).await.is_err());
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::Execute("DELETE FROM page".into(), vec![])]
        );
    }
}
