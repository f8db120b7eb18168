//! The uniform response envelope.
//!
//! Every handler outcome, on every branch, is expressed as an
//! `Envelope` before it reaches a hosting adapter. Browser callers sit
//! on a different origin, so every envelope carries
//! `Access-Control-Allow-Origin: *`; success envelopes additionally
//! allow the `Content-Type` request header.

use serde_json::{json, Value};

/// CORS header present on every response.
pub const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");

/// CORS header present on success responses.
pub const ALLOW_HEADERS: (&str, &str) = ("Access-Control-Allow-Headers", "Content-Type");

/// Body of the route-not-found fallback response.
pub const INVALID_ROUTE_MESSAGE: &str = "Invalid route or method";

/// A transport-agnostic HTTP-shaped response: status code, headers,
/// and a JSON body. Hosting adapters translate this into their native
/// response type without inspecting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Envelope {
    /// A 200 response with both CORS headers.
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: vec![
                (ALLOW_ORIGIN.0.to_string(), ALLOW_ORIGIN.1.to_string()),
                (ALLOW_HEADERS.0.to_string(), ALLOW_HEADERS.1.to_string()),
            ],
            body,
        }
    }

    /// A non-success response. Carries the origin header only,
    /// matching the observed contract.
    pub fn error(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![(ALLOW_ORIGIN.0.to_string(), ALLOW_ORIGIN.1.to_string())],
            body,
        }
    }

    /// The fixed fallback for requests no route matches.
    pub fn route_not_found() -> Self {
        Self::error(404, json!({ "error": INVALID_ROUTE_MESSAGE }))
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
