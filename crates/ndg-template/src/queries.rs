//! Named queries for the template table

use fhsk_core::StaticQueryLibrary;

pub const CREATE_TABLE: &str = "template.create_table";
pub const FETCH_RECENT: &str = "template.fetch_recent";
pub const SEARCH_BY_NAME: &str = "template.search_by_name";
pub const COUNT_BY_IS_ARCHIVED: &str = "template.count_by_is_archived";

/// Query library for the `template` table
pub fn template_queries() -> StaticQueryLibrary {
    StaticQueryLibrary::new()
        .register(
            CREATE_TABLE,
            r#"
            CREATE TABLE IF NOT EXISTS template (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                content TEXT,
                description TEXT,
                is_archived INTEGER NOT NULL DEFAULT 0,
                created_at TEXT
            )
            "#,
        )
        .register(
            FETCH_RECENT,
            "SELECT * FROM template ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .register(
            SEARCH_BY_NAME,
            "SELECT * FROM template WHERE name LIKE ? ORDER BY name",
        )
        .register(
            COUNT_BY_IS_ARCHIVED,
            "SELECT is_archived, COUNT(*) AS total FROM template GROUP BY is_archived ORDER BY is_archived",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhsk_core::QueryLibrary;

    #[test]
    fn every_template_query_is_registered() {
        let library = template_queries();

        for name in [CREATE_TABLE, FETCH_RECENT, SEARCH_BY_NAME, COUNT_BY_IS_ARCHIVED] {
            assert!(library.get_query_by_name(name).is_ok(), "{name} missing");
        }
        assert_eq!(library.len(), 4);
    }
}
