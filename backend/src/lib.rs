//! Music Library Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod pagination;
pub mod router;
pub mod songs;
pub mod state;
