//! Template admin routes
//!
//! `/{site_key}/admin/template[/][:action][/:id][/:returnAction]`

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{ApiResponse, DeletedTemplate, TemplateForm},
    site::Site,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use ndg_template::Template;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, error, info};

static ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("action pattern is valid"));
static ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("id pattern is valid"));

const DEFAULT_ACTION: &str = "list";

/// Create template admin routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{site_key}/admin/template", get(get_action).post(post_action))
        .route("/{site_key}/admin/template/", get(get_action).post(post_action))
        .route(
            "/{site_key}/admin/template/{action}",
            get(get_action).post(post_action),
        )
        .route(
            "/{site_key}/admin/template/{action}/{id}",
            get(get_action).post(post_action),
        )
        .route(
            "/{site_key}/admin/template/{action}/{id}/{return_action}",
            get(get_action).post(post_action),
        )
}

/// Actions of the template admin controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    List,
    Active,
    Archived,
    Show,
    Add,
    Edit,
    Archive,
    Unarchive,
    Delete,
}

impl AdminAction {
    fn from_name(name: &str) -> Result<Self> {
        Ok(match name {
            "list" => Self::List,
            "active" => Self::Active,
            "archived" => Self::Archived,
            "show" => Self::Show,
            "add" => Self::Add,
            "edit" => Self::Edit,
            "archive" => Self::Archive,
            "unarchive" => Self::Unarchive,
            "delete" => Self::Delete,
            _ => return Err(ApiError::ActionNotFound(name.to_string())),
        })
    }
}

/// Matched segments of an admin template route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRoute {
    pub site_key: String,
    pub action: String,
    pub id: Option<i64>,
    pub return_action: Option<String>,
}

impl AdminRoute {
    /// Apply the segment constraints; a segment that violates them is no match
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let site_key = params
            .get("site_key")
            .cloned()
            .ok_or_else(|| ApiError::bad_request("missing site key"))?;

        let action = match params.get("action").map(String::as_str) {
            None | Some("") => DEFAULT_ACTION.to_string(),
            Some(action) if ACTION.is_match(action) => action.to_string(),
            Some(action) => return Err(ApiError::ActionNotFound(action.to_string())),
        };

        // `[/:id][/:returnAction]` are independently optional: a lone non-numeric
        // segment after the action is the return action
        let (id, return_action) = match (params.get("id"), params.get("return_action")) {
            (Some(segment), None) if !ID.is_match(segment) => (None, Some(segment)),
            segments => segments,
        };

        let id = match id {
            None => None,
            Some(id) if ID.is_match(id) => Some(
                id.parse()
                    .map_err(|_| ApiError::ActionNotFound(format!("{}/{}", action, id)))?,
            ),
            Some(id) => return Err(ApiError::ActionNotFound(format!("{}/{}", action, id))),
        };

        let return_action = match return_action {
            None => None,
            Some(r) if ACTION.is_match(r) => Some(r.clone()),
            Some(r) => return Err(ApiError::ActionNotFound(r.clone())),
        };

        Ok(Self {
            site_key,
            action,
            id,
            return_action,
        })
    }

    pub fn admin_action(&self) -> Result<AdminAction> {
        AdminAction::from_name(&self.action)
    }

    fn require_id(&self) -> Result<i64> {
        self.id
            .ok_or_else(|| ApiError::ActionNotFound(format!("{} without an id", self.action)))
    }

    /// Where to send the client after a mutating action
    pub fn redirect(&self, site: &Site) -> String {
        format!(
            "/{}/admin/template/{}",
            site.key,
            self.return_action.as_deref().unwrap_or(DEFAULT_ACTION)
        )
    }
}

/// Read-only actions
async fn get_action(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Response> {
    let route = AdminRoute::from_params(&params)?;
    let site = state.sites.get(&route.site_key)?;
    debug!("GET template admin {} for site {}", route.action, site.key);

    let response = match route.admin_action()? {
        AdminAction::List => {
            let templates = state.templates.fetch_all().await.map_err(|e| {
                error!("Failed to list templates: {}", e);
                e
            })?;
            Json(ApiResponse::new(site, templates.into_vec())).into_response()
        }
        AdminAction::Active => {
            let templates = state.templates.fetch_by_is_archived(false).await?;
            Json(ApiResponse::new(site, templates.into_vec())).into_response()
        }
        AdminAction::Archived => {
            let templates = state.templates.fetch_by_is_archived(true).await?;
            Json(ApiResponse::new(site, templates.into_vec())).into_response()
        }
        AdminAction::Show => {
            let template = state.templates.get_template(route.require_id()?).await?;
            Json(ApiResponse::new(site, template)).into_response()
        }
        _ => return Err(ApiError::MethodNotAllowed(route.action.clone())),
    };

    Ok(response)
}

/// Mutating actions
async fn post_action(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response> {
    let route = AdminRoute::from_params(&params)?;
    let site = state.sites.get(&route.site_key)?;
    let redirect = route.redirect(site);

    let response = match route.admin_action()? {
        AdminAction::Add => {
            let form = parse_form(&body)?;
            let mut template = Template::default();
            form.apply_to(&mut template);

            let id = state.templates.save_template(&mut template).await.map_err(|e| {
                error!("Failed to add template: {}", e);
                e
            })?;
            info!("Added template {} on site {}", id, site.key);

            let body = ApiResponse::new(site, template)
                .with_message(format!("Template {} added", id))
                .with_redirect(redirect);
            (StatusCode::CREATED, Json(body)).into_response()
        }
        AdminAction::Edit => {
            let id = route.require_id()?;
            let form = parse_form(&body)?;
            let mut template = state.templates.get_template(id).await?;
            form.apply_to(&mut template);

            state.templates.save_template(&mut template).await?;
            info!("Edited template {} on site {}", id, site.key);

            let body = ApiResponse::new(site, template)
                .with_message(format!("Template {} saved", id))
                .with_redirect(redirect);
            Json(body).into_response()
        }
        AdminAction::Archive | AdminAction::Unarchive => {
            let id = route.require_id()?;
            let mut template = state.templates.get_template(id).await?;
            if route.admin_action()? == AdminAction::Archive {
                template.archive();
            } else {
                template.unarchive();
            }

            state.templates.save_template(&mut template).await?;
            info!("Set archived={} on template {}", template.is_archived, id);

            let body = ApiResponse::new(site, template).with_redirect(redirect);
            Json(body).into_response()
        }
        AdminAction::Delete => {
            let id = route.require_id()?;
            let deleted = state.templates.delete_template(id).await?;
            info!("Deleted template {} on site {} ({} rows)", id, site.key, deleted);

            let body = ApiResponse::new(site, DeletedTemplate { id, deleted })
                .with_message(format!("Template {} deleted", id))
                .with_redirect(redirect);
            Json(body).into_response()
        }
        _ => return Err(ApiError::MethodNotAllowed(route.action.clone())),
    };

    Ok(response)
}

fn parse_form(body: &[u8]) -> Result<TemplateForm> {
    let form: TemplateForm = serde_json::from_slice(body)?;
    form.validate()?;
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn action_defaults_to_list() {
        let route = AdminRoute::from_params(&params(&[("site_key", "ngame")])).unwrap();

        assert_eq!(route.action, "list");
        assert_eq!(route.id, None);
        assert_eq!(route.admin_action().unwrap(), AdminAction::List);
    }

    #[test]
    fn full_route_is_parsed() {
        let route = AdminRoute::from_params(&params(&[
            ("site_key", "ngame"),
            ("action", "edit"),
            ("id", "420"),
            ("return_action", "archived"),
        ]))
        .unwrap();

        assert_eq!(route.id, Some(420));
        let site = Site {
            key: "ngame".into(),
            name: "Ngame".into(),
        };
        assert_eq!(route.redirect(&site), "/ngame/admin/template/archived");
    }

    #[test]
    fn segment_constraints_are_enforced() {
        let bad_action = params(&[("site_key", "s"), ("action", "9lives")]);
        let bad_id = params(&[("site_key", "s"), ("action", "show"), ("id", "4x")]);
        let bad_return = params(&[
            ("site_key", "s"),
            ("action", "edit"),
            ("id", "1"),
            ("return_action", "-list"),
        ]);

        for p in [bad_action, bad_id, bad_return] {
            assert!(matches!(
                AdminRoute::from_params(&p),
                Err(ApiError::ActionNotFound(_))
            ));
        }
    }

    #[test]
    fn lone_segment_after_action_can_be_the_return_action() {
        let route = AdminRoute::from_params(&params(&[
            ("site_key", "ngame"),
            ("action", "add"),
            ("id", "archived"),
        ]))
        .unwrap();

        assert_eq!(route.id, None);
        assert_eq!(route.return_action.as_deref(), Some("archived"));
        assert!(matches!(route.require_id(), Err(ApiError::ActionNotFound(_))));

        let route = AdminRoute::from_params(&params(&[
            ("site_key", "ngame"),
            ("action", "edit"),
            ("id", "42"),
        ]))
        .unwrap();
        assert_eq!((route.id, route.return_action), (Some(42), None));
    }

    #[test]
    fn unknown_but_well_formed_actions_are_not_found() {
        let route =
            AdminRoute::from_params(&params(&[("site_key", "s"), ("action", "publish_all")]))
                .unwrap();
        assert!(matches!(route.admin_action(), Err(ApiError::ActionNotFound(_))));
    }
}
