//! OpenAPI document for the song catalog
//!
//! Served as JSON at [`OPENAPI_JSON_PATH`] and browsable through Swagger UI
//! at [`SWAGGER_UI_PATH`].

use crate::api::songs::{self, MessageResponse};
use crate::error::ErrorBody;
use crate::songs::{CreateSongRequest, Song, SongPatch};
use utoipa::OpenApi;

/// Mount point of the Swagger UI
pub const SWAGGER_UI_PATH: &str = "/swagger";

/// Location of the raw OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Generated description of every song endpoint
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Music Library API",
        description = "Song catalog with substring filtering, verse pagination and enriched creation"
    ),
    paths(
        songs::list_songs,
        songs::get_song_verses,
        songs::update_song,
        songs::delete_song,
        songs::create_song,
    ),
    components(schemas(Song, SongPatch, CreateSongRequest, MessageResponse, ErrorBody)),
    tags((name = "songs", description = "Song catalog operations"))
)]
pub struct ApiDoc;
