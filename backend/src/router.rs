//! HTTP routing and middleware
//!
//! Maps method+path to the song handlers, mounts the API docs and wraps
//! everything in request logging, tracing and permissive CORS.

use crate::api::{
    self,
    docs::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH},
};
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Peer address recorded by `into_make_service_with_connect_info`
fn client_addr(request: &Request) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Tags each request with an id and the caller's address, then logs the outcome
async fn request_log_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let client = client_addr(&request)
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        client_ip = %client,
        method = %method,
        path = %path,
    );
    let response = next.run(request).instrument(span).await;

    info!(
        request_id = %request_id,
        client_ip = %client,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis(),
        "Handled request"
    );
    response
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the application router over `state`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/songs",
            get(api::songs::list_songs).post(api::songs::create_song),
        )
        .route("/songs/:id/verse", get(api::songs::get_song_verses))
        .route(
            "/songs/:id",
            put(api::songs::update_song).delete(api::songs::delete_song),
        )
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        // request logging runs innermost so it sees the handler's status
        .layer(axum::middleware::from_fn(request_log_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::EnrichmentClient;
    use crate::songs::memory::MemorySongStore;
    use crate::songs::{NewSong, Song};
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// Serve the router on an ephemeral port, returning its base URL
    async fn spawn_app(store: Arc<MemorySongStore>) -> String {
        let enrichment = EnrichmentClient::new("http://127.0.0.1:9/info").unwrap();
        let app = build_router(AppState::new(store, enrichment));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });
        format!("http://{}", addr)
    }

    async fn seeded_store() -> Arc<MemorySongStore> {
        let song = |group: &str, title: &str, text: &str| NewSong {
            group: group.to_string(),
            title: title.to_string(),
            release_date: "2006".to_string(),
            text: text.to_string(),
            link: "https://example.com".to_string(),
        };
        Arc::new(
            MemorySongStore::with_songs(vec![
                song("Muse", "Uprising", "A\n\nB\n\nC"),
                song("Radiohead", "Creep", "X"),
                song("Queen", "Bohemian Rhapsody", "Y"),
            ])
            .await,
        )
    }

    #[tokio::test]
    async fn test_list_filtered_page_over_http() {
        let base = spawn_app(seeded_store().await).await;
        let response = reqwest::Client::new()
            .get(format!("{}/songs?group=Muse&page=1&limit=1", base))
            .header("origin", "http://example.com")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let songs: Vec<Song> = response.json().await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Uprising");
    }

    #[tokio::test]
    async fn test_verse_pages_over_http() {
        let base = spawn_app(seeded_store().await).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/songs/1/verse?page=2&limit=1", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let verses: Vec<String> = response.json().await.unwrap();
        assert_eq!(verses, vec!["B"]);

        let response = client
            .get(format!("{}/songs/1/verse?page=10&limit=1", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Page not found" }));
    }

    #[tokio::test]
    async fn test_invalid_id_over_http() {
        let base = spawn_app(seeded_store().await).await;
        let response = reqwest::Client::new()
            .delete(format!("{}/songs/abc", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Invalid song ID" }));
    }

    #[tokio::test]
    async fn test_malformed_bodies_rejected() {
        let store = seeded_store().await;
        let base = spawn_app(store.clone()).await;
        let client = reqwest::Client::new();

        for request in [
            client.put(format!("{}/songs/1", base)),
            client.post(format!("{}/songs", base)),
        ] {
            let response = request
                .header("content-type", "application/json")
                .body("{not json")
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = response.json().await.unwrap();
            assert_eq!(body, json!({ "error": "Invalid request body" }));
        }
        assert_eq!(store.count().await, 3);
    }

    #[tokio::test]
    async fn test_update_then_delete_over_http() {
        let base = spawn_app(seeded_store().await).await;
        let client = reqwest::Client::new();

        let response = client
            .put(format!("{}/songs/3", base))
            .json(&json!({ "releaseDate": "31.10.1975", "link": null }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let song: Song = response.json().await.unwrap();
        assert_eq!(song.release_date, "31.10.1975");
        assert_eq!(song.link, "https://example.com");

        let response = client
            .delete(format!("{}/songs/3", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "message": "Song deleted successfully" }));

        let response = client
            .put(format!("{}/songs/3", base))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let base = spawn_app(seeded_store().await).await;
        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{}/songs", base))
            .header("origin", "http://example.com")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_health_check() {
        let base = spawn_app(seeded_store().await).await;
        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_repeated_query_keys_keep_first_value() {
        let base = spawn_app(seeded_store().await).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/songs?group=Muse&group=Muse", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let songs: Vec<Song> = response.json().await.unwrap();
        assert_eq!(songs.len(), 1);

        let response = client
            .get(format!("{}/songs?limit=1&page=1&page=2", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let songs: Vec<Song> = response.json().await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, 1);

        let response = client
            .get(format!("{}/songs/1/verse?limit=1&limit=2", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let verses: Vec<String> = response.json().await.unwrap();
        assert_eq!(verses, vec!["A"]);
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let base = spawn_app(seeded_store().await).await;
        let response = reqwest::get(format!("{}{}", base, OPENAPI_JSON_PATH))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc: Value = response.json().await.unwrap();
        assert!(doc["paths"]["/songs/{id}/verse"]["get"].is_object());

        let response = reqwest::get(format!("{}{}/", base, SWAGGER_UI_PATH))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_client_addr_from_connect_info() {
        let peer: SocketAddr = "203.0.113.7:51000".parse().unwrap();
        let mut request = Request::new(axum::body::Body::empty());
        assert_eq!(client_addr(&request), None);

        request.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_addr(&request), Some(peer));
    }
}
