//! Router assembly and server entry point.

use std::{sync::Arc, time::Instant};

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::{InpaintTool, handlers};

/// State shared by the handlers: the tool that performs the inpainting.
pub struct AppState<T> {
    tool: Arc<T>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            tool: Arc::clone(&self.tool),
        }
    }
}

impl<T: InpaintTool> AppState<T> {
    pub fn new(tool: T) -> Self {
        Self {
            tool: Arc::new(tool),
        }
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }
}

/// Builds the router with every route, request logging and a permissive
/// CORS policy.
pub fn build_router<T: InpaintTool>(state: AppState<T>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/iopaint", post(handlers::run_iopaint::<T>))
        .route("/api/list-output", get(handlers::list_output))
        .route("/api/serve-image", get(handlers::serve_image))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on `listener` until the server fails.
pub async fn serve<T: InpaintTool>(
    listener: TcpListener,
    state: AppState<T>,
) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}

/// Logs method, URI, status and duration of every request.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        log::error!("{method} {uri} -> {} ({duration_ms} ms)", status.as_u16());
    } else if status.is_client_error() {
        log::warn!("{method} {uri} -> {} ({duration_ms} ms)", status.as_u16());
    } else {
        log::info!("{method} {uri} -> {} ({duration_ms} ms)", status.as_u16());
    }

    response
}
