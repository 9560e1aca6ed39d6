//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting:
//! the caller receives `{"error": "<short message>"}` while the full detail is
//! logged server-side.

use crate::enrichment::EnrichmentError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Application-level error types
///
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Path segment is not a valid song id
    #[error("Invalid song ID: {0}")]
    InvalidSongId(String),

    /// Request body could not be decoded
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    /// Query string could not be decoded
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    /// Request body lacks a required field
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    /// Song with the given ID was not found
    #[error("Song not found: {0}")]
    SongNotFound(i64),

    /// The list query matched nothing on the requested page
    #[error("No songs found")]
    NoSongsFound,

    /// The requested page lies past the end of the collection
    #[error("Page not found: {0}")]
    PageNotFound(u32),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// External enrichment lookup failed
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),
}

impl AppError {
    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidSongId(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::MissingFields(_) => StatusCode::BAD_REQUEST,
            AppError::SongNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoSongsFound => StatusCode::NOT_FOUND,
            AppError::PageNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Enrichment(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message returned to the caller
    ///
    /// Server-side failures never leak their detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidSongId(_) => "Invalid song ID".to_string(),
            AppError::InvalidPayload(_) => "Invalid request body".to_string(),
            AppError::InvalidQuery(_) => "Invalid query string".to_string(),
            AppError::MissingFields(fields) => format!("Fields {} are required", fields),
            AppError::SongNotFound(_) => "Song not found".to_string(),
            AppError::NoSongsFound => "No songs found".to_string(),
            AppError::PageNotFound(_) => "Page not found".to_string(),
            AppError::Database(_) => "Database error".to_string(),
            AppError::Enrichment(_) => "External service error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Short human-readable message
    #[schema(example = "Song not found")]
    pub error: String,
}
