//! Sites served by this process

use crate::error::{ApiError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// One site, addressed by the `site_key` route segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub key: String,
    pub name: String,
}

/// Site lookup by key, fixed at startup
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: HashMap<String, Site>,
}

impl SiteRegistry {
    pub fn new(sites: &[(String, String)]) -> Self {
        let sites = sites
            .iter()
            .map(|(key, name)| {
                let site = Site {
                    key: key.clone(),
                    name: name.clone(),
                };
                (key.clone(), site)
            })
            .collect();

        Self { sites }
    }

    /// The site registered under `key`
    pub fn get(&self, key: &str) -> Result<&Site> {
        self.sites
            .get(key)
            .ok_or_else(|| ApiError::SiteNotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_sites_by_key() {
        let registry = SiteRegistry::new(&[
            ("ngame".to_string(), "Ngame".to_string()),
            ("demo".to_string(), "FhskDemo".to_string()),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("ngame").unwrap().name, "Ngame");
        assert!(matches!(registry.get("other"), Err(ApiError::SiteNotFound(_))));
    }
}
