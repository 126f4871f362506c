use app_extractors::{ErrorKind, ExtractionError};
use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Tells callers which kind of failure a 503 is, the body only carries the message
pub static ERROR_KIND_HEADER: HeaderName = HeaderName::from_static("x-extraction-error");

/// A record on success, a JSON string with the reason otherwise
#[derive(Debug)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(ExtractionError),
}

impl<T> From<Result<T, ExtractionError>> for ApiResponse<T> {
    fn from(value: Result<T, ExtractionError>) -> Self {
        match value {
            Ok(x) => Self::Success(x),
            Err(e) => Self::Failure(e),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match self {
            Self::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Failure(e) => failure(e.kind(), e.message()),
        }
    }
}

#[must_use]
pub fn failure(kind: ErrorKind, message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(
            ERROR_KIND_HEADER.clone(),
            HeaderValue::from_static(kind.as_str()),
        )],
        Json(message),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn failures_are_json_strings() {
        let res = ApiResponse::<()>::Failure(ExtractionError::NotFound(
            "Failed to find video.".to_string(),
        ))
        .into_response();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            res.headers().get(&ERROR_KIND_HEADER).map(HeaderValue::as_bytes),
            Some(&b"not-found"[..])
        );
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], br#""Failed to find video.""#);
    }

    #[tokio::test]
    async fn success_is_the_bare_record() {
        let res = ApiResponse::Success(serde_json::json!({ "entries": [] })).into_response();

        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], br#"{"entries":[]}"#);
    }
}
