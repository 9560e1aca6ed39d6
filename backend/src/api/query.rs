//! Query string extraction
//!
//! `FirstValueQuery` decodes the query string the way the list and verse
//! endpoints expect: a repeated key keeps its first value, and any failure
//! is reported as an [`AppError`] so the response stays JSON.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Query extractor with first-value-wins semantics for repeated keys
#[derive(Debug)]
pub struct FirstValueQuery<T>(pub T);

impl<T: DeserializeOwned> FirstValueQuery<T> {
    /// Build `T` from decoded key/value pairs, keeping the first value of each key
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut fields = Map::new();
        for (key, value) in pairs {
            fields.entry(key).or_insert(Value::String(value));
        }

        serde_json::from_value(Value::Object(fields))
            .map(FirstValueQuery)
            .map_err(|e| AppError::InvalidQuery(e.to_string()))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for FirstValueQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| AppError::InvalidQuery(rejection.body_text()))?;
        Self::from_pairs(pairs)
    }
}
