//! Admin-managed template content.
//!
//! [`Template`] mirrors one row of the `template` table and [`TemplateTable`]
//! translates fetch, save and delete operations into table gateway calls.

pub mod queries;
pub mod table;
pub mod template;

pub use queries::template_queries;
pub use table::{Clock, TemplateRepository, TemplateTable};
pub use template::Template;
