//! Pagination helpers
//!
//! Turns raw `page`/`limit` query strings into a bounded page window and
//! slices in-memory sequences by that window.

/// Default page for every paginated endpoint
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for the song list
pub const DEFAULT_SONG_LIMIT: u32 = 10;

/// Default page size for verse pagination
pub const DEFAULT_VERSE_LIMIT: u32 = 1;

/// A validated page window (both values are always positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: u32,
    /// Number of items per page
    pub limit: u32,
}

impl Pagination {
    /// Parse `page` and `limit` from optional query strings
    ///
    /// Values that are absent, non-numeric, or not strictly positive fall
    /// back to the corresponding default.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        default_page: u32,
        default_limit: u32,
    ) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(default_page),
            limit: parse_positive(limit).unwrap_or(default_limit),
        }
    }

    /// Number of items skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.parse::<u32>().ok()).filter(|v| *v > 0)
}

/// Return the page of `items` selected by `pagination`
///
/// Returns `None` when the page starts past the end of the sequence, which
/// callers report as "not found". A page that starts in range is clipped to
/// the sequence length.
pub fn paginate_slice<T>(items: &[T], pagination: Pagination) -> Option<&[T]> {
    let start = usize::try_from(pagination.offset()).ok()?;
    if start >= items.len() {
        return None;
    }
    let end = start
        .saturating_add(pagination.limit as usize)
        .min(items.len());
    Some(&items[start..end])
}
