//! Entities and the result sets that hydrate them

use crate::error::Result;
use crate::predicate::RowData;

/// An in-memory record mirroring one persisted row
pub trait Entity: Clone + Send + Sync {
    /// Assign every recognized field from `data`; unknown keys are ignored
    fn exchange_array(&mut self, data: &RowData) -> Result<()>;

    /// Copy of all recognized fields, keyed by column name
    fn get_array_copy(&self) -> RowData;
}

/// Iterable collection of rows, each hydrated into a typed entity
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<T> {
    items: Vec<T>,
}

impl<T: Entity> ResultSet<T> {
    /// Hydrate `rows` by cloning `prototype` and exchanging each row into the clone
    pub fn initialize(prototype: &T, rows: Vec<RowData>) -> Result<Self> {
        let items = rows
            .iter()
            .map(|row| {
                let mut entity = prototype.clone();
                entity.exchange_array(row)?;
                Ok(entity)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { items })
    }
}

impl<T> ResultSet<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First entity in the set
    pub fn current(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for ResultSet<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
