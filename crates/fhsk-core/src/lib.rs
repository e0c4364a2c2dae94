//! # FhSiteKit core
//!
//! Shared data-access building blocks for site kit modules:
//! - [`TableGateway`]: select/insert/update/delete against one named table
//! - [`Entity`] and [`ResultSet`]: rows hydrated into typed records
//! - [`QueryLibrary`]: named SQL lookups
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fhsk_core::{MemoryTableGateway, Predicate, TableGateway};
//! use serde_json::json;
//!
//! # async fn example() -> fhsk_core::Result<()> {
//! let gateway = MemoryTableGateway::new("page");
//! let row = json!({"title": "Home", "is_archived": 0});
//! let id = gateway.insert(row.as_object().cloned().unwrap()).await?;
//!
//! let rows = gateway.select(Some(&Predicate::eq("id", id))).await?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod gateway;
pub mod predicate;
pub mod query_library;

pub use entity::{Entity, ResultSet};
pub use error::{FhskError, Result};
pub use gateway::{GatewayCall, MemoryTableGateway, RecordingTableGateway, TableGateway};
pub use predicate::{Predicate, RowData};
pub use query_library::{QueryLibrary, StaticQueryLibrary};

#[cfg(feature = "sqlite")]
pub use gateway::SqliteTableGateway;
