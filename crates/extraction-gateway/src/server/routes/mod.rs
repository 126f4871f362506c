use std::any::Any;

use app_extractors::ErrorKind;
use axum::{http::StatusCode, response::Response, Router};
use tower_http::catch_panic::CatchPanicLayer;

use super::{app_response::failure, AppRouter};

mod index;
mod tiktok;
mod twitch;
mod twitter;
mod youtube;

pub(super) fn router() -> AppRouter {
    Router::new()
        .merge(index::router())
        .nest("/youtube", youtube::router())
        .nest("/twitch", twitch::router())
        .nest("/tiktok", tiktok::router())
        .nest("/twitter", twitter::router())
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(CatchPanicLayer::custom(
            |err: Box<dyn Any + Send + 'static>| -> Response {
                let details = err.downcast_ref::<String>().map_or_else(
                    || {
                        err.downcast_ref::<&str>().map_or_else(
                            || "Unknown panic message".to_string(),
                            |s| (*s).to_string(),
                        )
                    },
                    std::clone::Clone::clone,
                );

                app_logger::error!("Request handler panicked: {details}");

                failure(ErrorKind::Generic, &details)
            },
        ))
}
