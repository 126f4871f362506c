use app_backend::BackendInfo;
use axum::{extract::State, routing::get, Json, Router};

use crate::server::{AppRouter, AppState};

pub(super) fn router() -> AppRouter {
    Router::new()
        .route("/ping", get(ping))
        .route("/backend", get(backend))
}

async fn ping() -> Json<&'static str> {
    Json("pong")
}

async fn backend(State(state): State<AppState>) -> Json<BackendInfo> {
    Json(state.backend.current().info().clone())
}
