use app_extractors::{extract_timed, records::StreamRecord};
use axum::{extract::State, routing::post, Router};

use crate::server::{app_request::AnyJson, app_response::ApiResponse, AppRouter, AppState};

pub(super) fn router() -> AppRouter {
    Router::new().route("/fetch", post(fetch))
}

/// The body is the bare URL as a JSON string
async fn fetch(
    State(state): State<AppState>,
    AnyJson(url): AnyJson<String>,
) -> ApiResponse<StreamRecord> {
    let backend = state.backend.current();

    extract_timed(&state.extractors.stream, backend.as_ref(), url)
        .await
        .into()
}
