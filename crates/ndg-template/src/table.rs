//! Data access for templates

use crate::queries;
use crate::template::{COLUMN_CREATED_AT, COLUMN_ID, COLUMN_IS_ARCHIVED, Template, current_timestamp};
use async_trait::async_trait;
use fhsk_core::{
    Entity, FhskError, Predicate, QueryLibrary, Result, ResultSet, TableGateway,
};
use serde_json::Value;
use std::sync::Arc;
use time::PrimitiveDateTime;
use tracing::{debug, info};

/// Source of the `created_at` stamp for new templates
pub type Clock = fn() -> PrimitiveDateTime;

/// Template data-access capability handed to request handlers
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Every template, in storage order
    async fn fetch_all(&self) -> Result<ResultSet<Template>>;

    /// Templates whose archived flag equals `is_archived`
    async fn fetch_by_is_archived(&self, is_archived: bool) -> Result<ResultSet<Template>>;

    /// The template with `id`, or [`FhskError::RowNotFound`]
    async fn get_template(&self, id: i64) -> Result<Template>;

    /// Insert a new template or overwrite an existing one; returns its id
    async fn save_template(&self, template: &mut Template) -> Result<i64>;

    /// Delete the template with `id`; deleting a missing row is not an error
    async fn delete_template(&self, id: i64) -> Result<u64>;
}

/// [`TemplateRepository`] over a table gateway
pub struct TemplateTable {
    gateway: Arc<dyn TableGateway>,
    queries: Option<Arc<dyn QueryLibrary>>,
    prototype: Template,
    clock: Clock,
}

impl TemplateTable {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            gateway,
            queries: None,
            prototype: Template::default(),
            clock: current_timestamp,
        }
    }

    /// Attach the library used by [`fetch_by_query`](Self::fetch_by_query) and
    /// [`ensure_schema`](Self::ensure_schema)
    pub fn with_query_library(mut self, queries: Arc<dyn QueryLibrary>) -> Self {
        self.queries = Some(queries);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn gateway(&self) -> &Arc<dyn TableGateway> {
        &self.gateway
    }

    /// Run a named query from the attached library and hydrate the rows
    pub async fn fetch_by_query(&self, name: &str, params: &[Value]) -> Result<ResultSet<Template>> {
        let sql = self.query_library()?.get_query_by_name(name)?;
        debug!(query = name, "fetching templates by named query");

        let rows = self.gateway.query(sql, params).await?;
        ResultSet::initialize(&self.prototype, rows)
    }

    /// Create the template table if it does not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let sql = self.query_library()?.get_query_by_name(queries::CREATE_TABLE)?;
        self.gateway.execute(sql, &[]).await?;
        info!(table = self.gateway.table(), "template schema ready");
        Ok(())
    }

    fn query_library(&self) -> Result<&dyn QueryLibrary> {
        self.queries
            .as_deref()
            .ok_or_else(|| FhskError::Unsupported("no query library configured".to_string()))
    }
}

#[async_trait]
impl TemplateRepository for TemplateTable {
    async fn fetch_all(&self) -> Result<ResultSet<Template>> {
        debug!("fetching all templates");
        let rows = self.gateway.select(None).await?;
        ResultSet::initialize(&self.prototype, rows)
    }

    async fn fetch_by_is_archived(&self, is_archived: bool) -> Result<ResultSet<Template>> {
        debug!(is_archived, "fetching templates by archive flag");
        let predicate = Predicate::eq(COLUMN_IS_ARCHIVED, i64::from(is_archived));
        let rows = self.gateway.select(Some(&predicate)).await?;
        ResultSet::initialize(&self.prototype, rows)
    }

    async fn get_template(&self, id: i64) -> Result<Template> {
        debug!(id, "fetching template");
        let rows = self.gateway.select(Some(&Predicate::eq(COLUMN_ID, id))).await?;

        ResultSet::initialize(&self.prototype, rows)?
            .into_iter()
            .next()
            .ok_or(FhskError::RowNotFound(id))
    }

    async fn save_template(&self, template: &mut Template) -> Result<i64> {
        match template.id() {
            None => {
                if template.created_at.is_none() {
                    template.created_at = Some((self.clock)());
                }

                let mut values = template.get_array_copy();
                values.remove(COLUMN_ID);

                let id = self.gateway.insert(values).await?;
                template.assign_id(id);
                info!(id, "inserted template");
                Ok(id)
            }
            Some(id) => {
                // the row must still exist; a missing row surfaces as RowNotFound
                self.get_template(id).await?;

                let mut values = template.get_array_copy();
                values.remove(COLUMN_ID);
                values.remove(COLUMN_CREATED_AT);

                self.gateway
                    .update(values, &Predicate::eq(COLUMN_ID, id))
                    .await?;
                info!(id, "updated template");
                Ok(id)
            }
        }
    }

    async fn delete_template(&self, id: i64) -> Result<u64> {
        let deleted = self.gateway.delete(&Predicate::eq(COLUMN_ID, id)).await?;
        info!(id, deleted, "deleted template");
        Ok(deleted)
    }
}
