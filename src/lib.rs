//! Core library for the toughdata-xlsx command line application.
//!
//! The library turns follower scraper output (profile records that each embed
//! a list of recent videos) into a two-sheet Excel workbook. Record shapes and
//! cells live in [`model`], the flattening of records into tables in
//! [`flatten`], file adapters under [`io`], and the end-to-end conversion in
//! [`export`].

pub mod error;
pub mod export;
pub mod flatten;
pub mod io;
pub mod model;

pub use error::{Result, ToolError};
