//! talentgate-api: hosting adapters
//!
//! Two thin adapters translate their hosting environment's native
//! request/response shapes into and out of the shared dispatcher in
//! `talentgate-server`:
//! - `http` - long-running axum server
//! - `faas` - managed-function invocation shape
//!
//! Neither adapter contains business logic; both funnel into the same
//! route table.

pub mod faas;
pub mod http;

pub use faas::{handle_event, FunctionEvent, FunctionResponse};
pub use http::create_router;
