//! State management module
//!
//! Holds the shared handles injected into every request handler.

pub mod app_state;

pub use app_state::AppState;
