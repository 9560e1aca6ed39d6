//! API module
//!
//! Contains HTTP request handlers for the song catalog endpoints, the query
//! extractor they share and the generated OpenAPI document.

pub mod docs;
pub mod query;
pub mod songs;
