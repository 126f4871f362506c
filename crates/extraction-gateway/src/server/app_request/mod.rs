use app_extractors::ErrorKind;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    response::Response,
};
use serde::de::DeserializeOwned;

use super::app_response::failure;

/// Like `axum::Json`, but doesn't care what the `Content-Type` says
#[derive(Debug, Clone)]
pub struct AnyJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AnyJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            failure(
                ErrorKind::Generic,
                &format!("Failed to read request body: {}", e.body_text()),
            )
        })?;

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            failure(
                ErrorKind::Generic,
                &format!("Failed to parse request body: {e}"),
            )
        })
    }
}
