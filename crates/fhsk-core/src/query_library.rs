//! Named SQL lookups

use crate::error::{FhskError, Result};
use std::collections::HashMap;

/// Supplies SQL text by query name
pub trait QueryLibrary: Send + Sync {
    /// Get the SQL registered under `name`
    fn get_query_by_name(&self, name: &str) -> Result<&str>;
}

/// Query library backed by a fixed table of `'static` queries
#[derive(Debug, Default, Clone)]
pub struct StaticQueryLibrary {
    queries: HashMap<&'static str, &'static str>,
}

impl StaticQueryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sql` under `name`, replacing any earlier registration
    pub fn register(mut self, name: &'static str, sql: &'static str) -> Self {
        self.queries.insert(name, sql);
        self
    }

    /// Registered query names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.queries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl QueryLibrary for StaticQueryLibrary {
    fn get_query_by_name(&self, name: &str) -> Result<&str> {
        self.queries
            .get(name)
            .copied()
            .ok_or_else(|| FhskError::QueryNotFound(name.to_string()))
    }
}
