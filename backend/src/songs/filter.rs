//! Song list filters
//!
//! Maps the recognized list query parameters to parameterized substring
//! predicates. Every active predicate is conjoined with AND.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

/// Substring filters accepted by `GET /songs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongFilter {
    /// Group name contains
    pub group: Option<String>,
    /// Title contains
    pub song: Option<String>,
    /// Release date contains
    pub release_date: Option<String>,
    /// Lyrics contain
    pub text: Option<String>,
    /// Source link contains
    pub link: Option<String>,
}

impl SongFilter {
    /// Active predicates as `(column, needle)` pairs
    ///
    /// Absent and empty parameters are skipped.
    pub fn predicates(&self) -> Vec<(&'static str, &str)> {
        [
            ("music_group", &self.group),
            ("song", &self.song),
            ("release_date", &self.release_date),
            ("text", &self.text),
            ("link", &self.link),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (column, v))
        })
        .collect()
    }

    /// Append a `WHERE` clause for the active predicates, if any
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (i, (column, needle)) in self.predicates().into_iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(column);
            builder.push(" LIKE ");
            builder.push_bind(format!("%{}%", needle));
        }
    }
}
