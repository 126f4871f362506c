use app_extractors::{
    extract_timed,
    records::{PlaylistRecord, VideoRecord},
    PlaylistRequest, SearchRequest,
};
use axum::{extract::State, routing::post, Router};
use serde::Deserialize;

use crate::server::{app_request::AnyJson, app_response::ApiResponse, AppRouter, AppState};

pub(super) fn router() -> AppRouter {
    Router::new()
        .route("/fetch", post(fetch))
        .route("/search", post(search))
        .route("/playlist", post(playlist))
}

#[derive(Debug, Deserialize)]
struct FetchBody {
    query: String,
}

async fn fetch(
    State(state): State<AppState>,
    AnyJson(body): AnyJson<FetchBody>,
) -> ApiResponse<VideoRecord> {
    let backend = state.backend.current();

    extract_timed(&state.extractors.video, backend.as_ref(), body.query)
        .await
        .into()
}

async fn search(
    State(state): State<AppState>,
    AnyJson(body): AnyJson<SearchRequest>,
) -> ApiResponse<PlaylistRecord> {
    let backend = state.backend.current();

    extract_timed(&state.extractors.search, backend.as_ref(), body)
        .await
        .into()
}

async fn playlist(
    State(state): State<AppState>,
    AnyJson(body): AnyJson<PlaylistRequest>,
) -> ApiResponse<PlaylistRecord> {
    let backend = state.backend.current();

    extract_timed(&state.extractors.playlist, backend.as_ref(), body)
        .await
        .into()
}
