pub mod manager;
pub mod models;

/// Embedded schema, applied by `studydesk init`.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");
