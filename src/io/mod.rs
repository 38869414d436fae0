//! Adapters between the on-disk formats and the in-memory tables.

pub mod excel_read;
pub mod excel_write;
pub mod json_read;
