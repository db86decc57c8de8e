// SPDX-License-Identifier: GPL-2.0-or-later
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Extension, Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit, ServiceBuilderExt,
};
use tracing::{error, warn, Level};

use crate::{db::Catalog, handler, Error};

pub(crate) mod handlers;

/// Build the HTTP front end for the given catalog.
///
/// Every method on `/` is handed to [`handler::handle`] as a platform invocation, so the
/// server answers exactly as the function platform would.
pub fn create_router(catalog: Arc<dyn Catalog>) -> Router {
    let app = Router::new()
        .route("/", any(handlers::sounds::invoke))
        .route("/status/", get(handlers::status::get))
        .fallback(handle_404)
        .layer(Extension(catalog));

    // Ordering matters here; requests pass through middleware top-to-bottom and responses bottom-to-top
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .propagate_x_request_id()
        .layer(CompressionLayer::new());

    app.layer(middleware)
}

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "This isn't the endpoint you're looking for",
    )
}

impl IntoResponse for handler::Response {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Body::from(self.body)).into_response();
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                (name, value) => warn!(?name, ?value, "Dropping unrepresentable header"),
            }
        }
        response
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!(err = %self, "Request failed");
        let (status, error_message) = match self {
            Error::Database(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "The database is unavailable",
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Something went oopsies"),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], body).into_response()
    }
}
