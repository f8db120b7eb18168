//! Long-running HTTP server adapter.
//!
//! The router exposes a liveness route and funnels everything else
//! through a single fallback that converts the axum request into a
//! [`RouteRequest`] for the shared dispatcher. Routing therefore lives
//! in exactly one place for both hosting shapes.

use std::collections::HashMap;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;

use talentgate_backends::{BlobStore, NotificationTopic, RoleStore};
use talentgate_server::{route, Envelope, Gateway, RouteRequest};

/// Request body size limit (1MB). Uploads themselves never pass
/// through the gateway; only small JSON bodies do.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Creates the HTTP router over the shared gateway state.
pub fn create_router<B, R, N>(gateway: Gateway<B, R, N>) -> Router
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    Router::new()
        .route("/health", get(health_check))
        .fallback(forward::<B, R, N>)
        .with_state(gateway)
        .layer(RequestBodyLimitLayer::new(DEFAULT_BODY_LIMIT))
}

/// Basic liveness probe. Not part of the routed operation set.
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Converts any inbound request into a `RouteRequest` and hands it to
/// the dispatcher.
async fn forward<B, R, N>(State(gateway): State<Gateway<B, R, N>>, request: Request) -> Response
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    let (parts, body) = request.into_parts();

    let query: HashMap<String, String> = parts
        .uri
        .query()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    let bytes = match axum::body::to_bytes(body, DEFAULT_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return into_response(Envelope::error(
                413,
                json!({ "error": "request body too large" }),
            ))
        }
    };

    let route_request = RouteRequest {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        query,
        body: if bytes.is_empty() {
            None
        } else {
            Some(bytes.to_vec())
        },
    };

    into_response(route(&gateway, route_request).await)
}

/// Translates an envelope into an axum response.
fn into_response(envelope: Envelope) -> Response {
    let Envelope {
        status,
        headers,
        body,
    } = envelope;

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(body)).into_response();
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}
