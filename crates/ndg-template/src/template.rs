//! The template entity

use fhsk_core::predicate::as_integer;
use fhsk_core::{Entity, FhskError, Result, RowData};
use serde::Serialize;
use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_CONTENT: &str = "content";
pub const COLUMN_DESCRIPTION: &str = "description";
pub const COLUMN_IS_ARCHIVED: &str = "is_archived";
pub const COLUMN_CREATED_AT: &str = "created_at";

/// Storage format of the `created_at` column
const SQL_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

time::serde::format_description!(sql_datetime, PrimitiveDateTime, SQL_DATETIME);

/// One row of the `template` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Template {
    id: Option<i64>,

    pub name: Option<String>,

    /// Free text body of the template
    pub content: Option<String>,

    pub description: Option<String>,

    pub is_archived: bool,

    #[serde(with = "sql_datetime::option")]
    pub created_at: Option<PrimitiveDateTime>,
}

impl Template {
    /// Create an unsaved, active template
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a template from a mapping, as a result set would
    pub fn from_row(data: &RowData) -> Result<Self> {
        let mut template = Self::default();
        template.exchange_array(data)?;
        Ok(template)
    }

    /// Storage-assigned identifier; `None` until the template has been saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn archive(&mut self) {
        self.is_archived = true;
    }

    pub fn unarchive(&mut self) {
        self.is_archived = false;
    }

    /// Record the id generated by storage. An id that is already set never changes.
    pub(crate) fn assign_id(&mut self, id: i64) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }
}

impl Entity for Template {
    fn exchange_array(&mut self, data: &RowData) -> Result<()> {
        let id = optional_id(data)?;
        if self.id.is_none() {
            self.id = id;
        }

        self.name = optional_text(data, COLUMN_NAME)?;
        self.content = optional_text(data, COLUMN_CONTENT)?;
        self.description = optional_text(data, COLUMN_DESCRIPTION)?;
        self.is_archived = flag(data, COLUMN_IS_ARCHIVED)?;
        self.created_at = optional_timestamp(data, COLUMN_CREATED_AT)?;

        Ok(())
    }

    fn get_array_copy(&self) -> RowData {
        let mut row = RowData::new();
        row.insert(COLUMN_ID.into(), self.id.map_or(Value::Null, Value::from));
        row.insert(COLUMN_NAME.into(), text_value(&self.name));
        row.insert(COLUMN_CONTENT.into(), text_value(&self.content));
        row.insert(COLUMN_DESCRIPTION.into(), text_value(&self.description));
        row.insert(COLUMN_IS_ARCHIVED.into(), Value::from(i64::from(self.is_archived)));
        // A PrimitiveDateTime carries every component SQL_DATETIME names, so
        // formatting it cannot fail
        let created_at = self.created_at.and_then(|ts| ts.format(SQL_DATETIME).ok());
        row.insert(
            COLUMN_CREATED_AT.into(),
            created_at.map_or(Value::Null, Value::from),
        );
        row
    }
}

/// Format a timestamp the way the `created_at` column stores it (`YYYY-MM-DD HH:MM:SS`)
pub fn format_timestamp(ts: &PrimitiveDateTime) -> Result<String> {
    ts.format(SQL_DATETIME)
        .map_err(|e| FhskError::invalid_row(format!("created_at: {}", e)))
}

/// Parse a `YYYY-MM-DD HH:MM:SS` column value
pub fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime> {
    PrimitiveDateTime::parse(value, SQL_DATETIME)
        .map_err(|e| FhskError::invalid_row(format!("created_at {:?}: {}", value, e)))
}

/// Current UTC time, truncated to whole seconds
pub fn current_timestamp() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    let now = now.replace_nanosecond(0).unwrap_or(now);
    PrimitiveDateTime::new(now.date(), now.time())
}

fn text_value(text: &Option<String>) -> Value {
    text.clone().map_or(Value::Null, Value::from)
}

fn optional_id(data: &RowData) -> Result<Option<i64>> {
    match data.get(COLUMN_ID) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => match as_integer(value) {
            Some(0) => Ok(None),
            Some(id) if id > 0 => Ok(Some(id)),
            _ => Err(FhskError::invalid_row(format!("id: {}", value))),
        },
    }
}

fn optional_text(data: &RowData, column: &str) -> Result<Option<String>> {
    match data.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(FhskError::invalid_row(format!("{}: {}", column, other))),
    }
}

fn flag(data: &RowData, column: &str) -> Result<bool> {
    match data.get(column) {
        None | Some(Value::Null) => Ok(false),
        Some(value) => match as_integer(value) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(FhskError::invalid_row(format!("{} must be 0 or 1, got {}", column, value))),
        },
    }
}

fn optional_timestamp(data: &RowData, column: &str) -> Result<Option<PrimitiveDateTime>> {
    match data.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => parse_timestamp(s).map(Some),
        Some(other) => Err(FhskError::invalid_row(format!("{}: {}", column, other))),
    }
}
