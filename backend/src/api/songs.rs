//! Song API handlers
//!
//! Contains HTTP request handlers for listing, paging through verses,
//! updating, deleting and creating songs.

use crate::api::query::FirstValueQuery;
use crate::error::{AppError, ErrorBody};
use crate::pagination::{
    paginate_slice, Pagination, DEFAULT_PAGE, DEFAULT_SONG_LIMIT, DEFAULT_VERSE_LIMIT,
};
use crate::songs::{CreateSongRequest, NewSong, Song, SongFilter, SongId, SongPatch};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query parameters of `GET /songs`
#[derive(Debug, Default, Deserialize)]
pub struct ListSongsQuery {
    /// Substring filters
    #[serde(flatten)]
    pub filter: SongFilter,
    /// Page number (raw)
    pub page: Option<String>,
    /// Page size (raw)
    pub limit: Option<String>,
}

/// Query parameters of `GET /songs/:id/verse`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (raw)
    pub page: Option<String>,
    /// Verses per page (raw)
    pub limit: Option<String>,
}

/// Message response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

fn parse_song_id(raw: &str) -> Result<SongId, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidSongId(raw.to_string()))
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))
}

async fn find_song(state: &AppState, id: SongId) -> Result<Song, AppError> {
    state
        .store
        .get(id)
        .await?
        .ok_or(AppError::SongNotFound(id))
}

/// GET /songs - List songs with filtering and pagination
#[utoipa::path(
    get,
    path = "/songs",
    tag = "songs",
    params(
        ("group" = Option<String>, Query, description = "Group name contains"),
        ("song" = Option<String>, Query, description = "Title contains"),
        ("releaseDate" = Option<String>, Query, description = "Release date contains"),
        ("text" = Option<String>, Query, description = "Lyrics contain"),
        ("link" = Option<String>, Query, description = "Source link contains"),
        ("page" = Option<u32>, Query, description = "Page number, default 1"),
        ("limit" = Option<u32>, Query, description = "Page size, default 10"),
    ),
    responses(
        (status = 200, description = "Matching songs ordered by id", body = [Song]),
        (status = 404, description = "No songs found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn list_songs(
    State(state): State<AppState>,
    FirstValueQuery(query): FirstValueQuery<ListSongsQuery>,
) -> Result<Json<Vec<Song>>, AppError> {
    let page = Pagination::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_PAGE,
        DEFAULT_SONG_LIMIT,
    );

    let songs = state.store.list(&query.filter, page).await?;
    if songs.is_empty() {
        return Err(AppError::NoSongsFound);
    }

    tracing::debug!(
        count = songs.len(),
        page = page.page,
        limit = page.limit,
        "Listed songs"
    );
    Ok(Json(songs))
}

/// GET /songs/:id/verse - Get a song's lyrics paginated by verse
#[utoipa::path(
    get,
    path = "/songs/{id}/verse",
    tag = "songs",
    params(
        ("id" = i64, Path, description = "Song ID"),
        ("page" = Option<u32>, Query, description = "Page number, default 1"),
        ("limit" = Option<u32>, Query, description = "Verses per page, default 1"),
    ),
    responses(
        (status = 200, description = "Verses on the requested page", body = [String]),
        (status = 400, description = "Invalid song ID", body = ErrorBody),
        (status = 404, description = "Song or page not found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn get_song_verses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FirstValueQuery(query): FirstValueQuery<PageQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let id = parse_song_id(&id)?;
    let page = Pagination::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_PAGE,
        DEFAULT_VERSE_LIMIT,
    );

    let song = find_song(&state, id).await?;
    let verses = song.verses();
    let selected = paginate_slice(&verses, page).ok_or(AppError::PageNotFound(page.page))?;

    Ok(Json(selected.iter().map(|v| v.to_string()).collect()))
}

/// DELETE /songs/:id - Delete a song
#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i64, Path, description = "Song ID")),
    responses(
        (status = 200, description = "Song deleted", body = MessageResponse),
        (status = 400, description = "Invalid song ID", body = ErrorBody),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_song_id(&id)?;
    find_song(&state, id).await?;

    if !state.store.delete(id).await? {
        return Err(AppError::SongNotFound(id));
    }

    tracing::info!(song_id = id, "Song deleted");
    Ok(Json(MessageResponse {
        message: "Song deleted successfully".to_string(),
    }))
}

/// PUT /songs/:id - Apply a partial update to a song
#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i64, Path, description = "Song ID")),
    request_body = SongPatch,
    responses(
        (status = 200, description = "Updated song", body = Song),
        (status = 400, description = "Invalid song ID or body", body = ErrorBody),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongPatch>, JsonRejection>,
) -> Result<Json<Song>, AppError> {
    let id = parse_song_id(&id)?;
    let patch = decode(payload)?;

    let mut song = find_song(&state, id).await?;
    song.apply(patch);

    let song = state.store.update(&song).await.map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::SongNotFound(id),
        other => AppError::Database(other),
    })?;

    tracing::info!(song_id = id, "Song updated");
    Ok(Json(song))
}

/// POST /songs - Create a song enriched with external details
#[utoipa::path(
    post,
    path = "/songs",
    tag = "songs",
    request_body = CreateSongRequest,
    responses(
        (status = 200, description = "Created song", body = Song),
        (status = 400, description = "Invalid body or missing fields", body = ErrorBody),
        (status = 500, description = "Enrichment or database error", body = ErrorBody)
    )
)]
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<Json<Song>, AppError> {
    let request = decode(payload)?;
    if request.group.is_empty() || request.title.is_empty() {
        return Err(AppError::MissingFields("'group' and 'song'".to_string()));
    }

    let details = state
        .enrichment
        .fetch_song_details(&request.group, &request.title)
        .await?;

    let new_song = NewSong {
        group: request.group,
        title: request.title,
        release_date: details.release_date,
        text: details.text,
        link: details.link,
    };
    let song = state.store.insert(&new_song).await?;

    tracing::info!(
        song_id = song.id,
        group = %song.group,
        song = %song.title,
        "Song created"
    );
    Ok(Json(song))
}
