//! Song details client
//!
//! Looks up release date, lyrics and source link for a new song in the
//! external music info service. One request per lookup, no retries.

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Total time allowed for one lookup, from send to body read
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised by the external lookup
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// The configured base URL cannot be parsed
    #[error("Invalid enrichment base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// Raw URL from configuration
        url: String,
        /// Parse failure
        reason: String,
    },

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure or timeout
    #[error("Failed to send request to enrichment service: {0}")]
    Request(#[source] reqwest::Error),

    /// The service answered with something other than 200 OK
    #[error("Enrichment service returned status {0}")]
    Status(StatusCode),

    /// The body is not the expected JSON document
    #[error("Failed to decode enrichment response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The body lacks one or more required fields
    #[error("Enrichment response is missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Details returned by a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDetails {
    /// Release date (free-form)
    pub release_date: String,
    /// Full lyrics
    pub text: String,
    /// Link to the source
    pub link: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongDetailsResponse {
    release_date: Option<String>,
    text: Option<String>,
    link: Option<String>,
}

impl TryFrom<SongDetailsResponse> for SongDetails {
    type Error = EnrichmentError;

    fn try_from(response: SongDetailsResponse) -> Result<Self, Self::Error> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());

        let missing: Vec<&'static str> = [
            ("releaseDate", present(&response.release_date)),
            ("text", present(&response.text)),
            ("link", present(&response.link)),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(EnrichmentError::MissingFields(missing));
        }

        Ok(Self {
            release_date: response.release_date.unwrap_or_default(),
            text: response.text.unwrap_or_default(),
            link: response.link.unwrap_or_default(),
        })
    }
}

/// HTTP client for the external song details service
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EnrichmentClient {
    /// Create a client for `base_url` with the default lookup timeout
    pub fn new(base_url: &str) -> Result<Self, EnrichmentError> {
        Self::with_timeout(base_url, LOOKUP_TIMEOUT)
    }

    /// Create a client for `base_url` with a custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, EnrichmentError> {
        let parsed = Url::parse(base_url).map_err(|e| EnrichmentError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EnrichmentError::Client)?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Fetch details for the song `title` by `group`
    ///
    /// # Errors
    /// Fails on transport errors and timeouts, on any status other than
    /// 200, on an undecodable body, and when any of `releaseDate`, `text`
    /// or `link` is absent or empty.
    pub async fn fetch_song_details(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetails, EnrichmentError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("group", group)
            .append_pair("song", title);

        tracing::debug!(url = %url, "Calling enrichment service");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(EnrichmentError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                status_code = status.as_u16(),
                "Enrichment service returned error status"
            );
            return Err(EnrichmentError::Status(status));
        }

        let body: SongDetailsResponse = response.json().await.map_err(EnrichmentError::Decode)?;
        let details = SongDetails::try_from(body)?;

        tracing::debug!(
            group = %group,
            song = %title,
            "Received song details from enrichment service"
        );

        Ok(details)
    }
}
