//! Songs module
//!
//! Song records, list filters, and their storage in PostgreSQL.

pub mod filter;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod store;

pub use filter::SongFilter;
pub use models::{CreateSongRequest, NewSong, Song, SongId, SongPatch};
pub use store::{PgSongStore, SongStore};
