//! HTTP routes

pub mod template_admin;
