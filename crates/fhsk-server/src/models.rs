//! API models for requests and responses

use crate::error::{ApiError, Result};
use crate::site::Site;
use ndg_template::Template;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,

    /// Site the request was made for
    pub site: Site,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Where the client should go after a mutating action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(site: &Site, data: T) -> Self {
        Self {
            data,
            site: site.clone(),
            message: None,
            redirect: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }
}

/// Body of the add and edit actions
#[derive(Debug, Deserialize)]
pub struct TemplateForm {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

impl TemplateForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("name must not be empty"));
        }
        if self.name.chars().count() > 100 {
            return Err(ApiError::validation("name must be at most 100 characters"));
        }
        if self.content.trim().is_empty() {
            return Err(ApiError::validation("content must not be empty"));
        }
        Ok(())
    }

    /// Overwrite the editable fields of `template`; id and creation time are kept
    pub fn apply_to(self, template: &mut Template) {
        template.name = Some(self.name.trim().to_string());
        template.content = Some(self.content);
        template.description = self.description.filter(|d| !d.trim().is_empty());
        template.is_archived = self.is_archived;
    }
}

/// Outcome of the delete action
#[derive(Debug, Serialize)]
pub struct DeletedTemplate {
    pub id: i64,
    pub deleted: u64,
}
