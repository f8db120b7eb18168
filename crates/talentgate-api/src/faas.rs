//! Managed-function invocation adapter.
//!
//! The hosting platform delivers HTTP-shaped events as JSON; this
//! adapter deserializes that shape, hands it to the shared dispatcher,
//! and serializes the envelope back into the platform's response
//! shape. It is a pure translation layer with no business logic and no
//! transport of its own, which also makes it the easiest way to
//! exercise the whole gateway in tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use talentgate_backends::{BlobStore, NotificationTopic, RoleStore};
use talentgate_server::{route, Gateway, RouteRequest};

/// An inbound invocation event in the platform's native shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionEvent {
    pub http_method: String,
    pub path: String,
    pub query_string_parameters: Option<HashMap<String, String>>,
    pub body: Option<String>,
}

/// The response shape the platform expects back.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// JSON body, pre-serialized as the platform requires.
    pub body: String,
}

/// Handles one invocation event against the shared gateway state.
pub async fn handle_event<B, R, N>(
    gateway: &Gateway<B, R, N>,
    event: FunctionEvent,
) -> FunctionResponse
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    let request = RouteRequest {
        method: event.http_method,
        path: event.path,
        query: event.query_string_parameters.unwrap_or_default(),
        body: event.body.map(String::into_bytes),
    };

    let envelope = route(gateway, request).await;

    FunctionResponse {
        status_code: envelope.status,
        headers: envelope.headers.into_iter().collect(),
        body: envelope.body.to_string(),
    }
}
