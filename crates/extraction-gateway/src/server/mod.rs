use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use app_backend::BackendSlot;
use app_config::file::ListenSettings;
use app_extractors::Extractors;
use axum::{
    http::{header, HeaderValue, Request},
    response::Response,
};
use listenfd::ListenFd;
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, field, info, Span};

pub mod app_request;
pub mod app_response;
mod routes;

pub async fn run(state: AppState, listen: &ListenSettings) -> anyhow::Result<()> {
    info!("Starting server...");

    let router = app(state);
    app_logger::trace!(?router, "Finished building app router");

    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener).context("Failed to adopt inherited listener")?
        }
        None => TcpListener::bind((listen.host.as_str(), listen.port))
            .await
            .with_context(|| format!("Failed to bind to {}:{}", listen.host, listen.port))?,
    };

    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// The complete application, middlewares included
pub fn app(state: AppState) -> axum::Router {
    add_middlewares(routes::router()).with_state(state)
}

static CACHE_CONTROL: Lazy<HeaderValue> = Lazy::new(|| HeaderValue::from_static("no-store"));

#[derive(Clone)]
struct MakeRequestUlid;
impl MakeRequestId for MakeRequestUlid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let mut id = ulid::Ulid::new().to_string();
        id.make_ascii_lowercase();
        let val = HeaderValue::from_str(&id).ok()?;

        Some(RequestId::new(val))
    }
}

type AppRouter = axum::Router<AppState>;

/// Shared by every request. Only the backend slot ever changes underneath.
#[derive(Debug, Clone)]
pub struct AppState {
    pub backend: BackendSlot,
    pub extractors: Arc<Extractors>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: BackendSlot, extractors: Extractors) -> Self {
        Self {
            backend,
            extractors: Arc::new(extractors),
        }
    }
}

fn add_middlewares<T>(router: axum::Router<T>) -> axum::Router<T>
where
    T: std::clone::Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUlid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<_>| {
                        let m = request.method();
                        let p = request.uri().path();
                        let id = request
                            .extensions()
                            .get::<RequestId>()
                            .and_then(|id| id.header_value().to_str().ok())
                            .unwrap_or("-");
                        let dur = field::Empty;

                        tracing::info_span!("", %id, %m, ?p, dur)
                    })
                    .on_request(|request: &Request<_>, _span: &Span| {
                        let headers = request.headers();
                        info!(
                            target: "request",
                            "START \"{method} {uri} {http_type:?}\" {user_agent:?}",
                            http_type = request.version(),
                            method = request.method(),
                            uri = request.uri(),
                            user_agent = headers
                                .get(header::USER_AGENT)
                                .map_or("-", |x| x.to_str().unwrap_or("-")),
                        );
                    })
                    .on_response(|response: &Response<_>, latency, span: &Span| {
                        span.record("dur", field::debug(latency));
                        debug!(
                            target: "request",
                            "END {status}",
                            status = response.status().as_u16(),
                        );
                    })
                    .on_body_chunk(())
                    .on_eos(|_trailers: Option<&_>, stream_duration, span: &Span| {
                        span.record("dur", field::debug(stream_duration));
                        debug!(
                            target: "request",
                            "ERR: stream closed unexpectedly",
                        );
                    })
                    .on_failure(|error, latency, span: &Span| {
                        span.record("dur", field::debug(latency));
                        debug!(
                            target: "request",
                            err = ?error,
                            "ERR: something went wrong",
                        );
                    }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                |_response: &Response<_>| Some(CACHE_CONTROL.clone()),
            )),
    )
}
