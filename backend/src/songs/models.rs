//! Song data models
//!
//! Defines the persisted song record and the request payloads that create
//! and patch it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Separator between verses in a song's full text
pub const VERSE_DELIMITER: &str = "\n\n";

/// Unique identifier of a stored song
pub type SongId = i64;

/// A song record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Store-assigned identifier
    pub id: SongId,
    /// Name of the performing group
    #[sqlx(rename = "music_group")]
    pub group: String,
    /// Song title
    #[serde(rename = "song")]
    #[sqlx(rename = "song")]
    pub title: String,
    /// Release date (free-form)
    pub release_date: String,
    /// Full lyrics, verses separated by a blank line
    pub text: String,
    /// Link to the source
    pub link: String,
}

impl Song {
    /// Split the lyrics into verses, in order
    pub fn verses(&self) -> Vec<&str> {
        self.text.split(VERSE_DELIMITER).collect()
    }

    /// Overwrite every field present in `patch`
    pub fn apply(&mut self, patch: SongPatch) {
        if let Some(group) = patch.group {
            self.group = group;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(release_date) = patch.release_date {
            self.release_date = release_date;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(link) = patch.link {
            self.link = link;
        }
    }
}

/// A song that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    /// Name of the performing group
    pub group: String,
    /// Song title
    pub title: String,
    /// Release date (free-form)
    pub release_date: String,
    /// Full lyrics
    pub text: String,
    /// Link to the source
    pub link: String,
}

/// Create song request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSongRequest {
    /// Name of the performing group
    #[serde(default)]
    pub group: String,
    /// Song title
    #[serde(default, rename = "song")]
    pub title: String,
}

/// Update song request
///
/// Absent and `null` fields leave the stored value untouched; an empty
/// string is a real value and overwrites it.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongPatch {
    /// New group name (optional)
    pub group: Option<String>,
    /// New title (optional)
    #[serde(rename = "song")]
    pub title: Option<String>,
    /// New release date (optional)
    pub release_date: Option<String>,
    /// New lyrics (optional)
    pub text: Option<String>,
    /// New source link (optional)
    pub link: Option<String>,
}
