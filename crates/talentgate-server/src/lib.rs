//! talentgate-server: transport-agnostic gateway core
//!
//! This crate contains everything both hosting shapes share:
//! - The closed route set and the dispatcher (`dispatch`)
//! - The four operation handlers (`handlers`)
//! - The uniform response envelope (`envelope`)
//! - The handler error taxonomy (`error`)
//! - Process-wide state and configuration (`state`, `config`)
//!
//! The hosting adapters in `talentgate-api` translate their native
//! request/response shapes into and out of this crate; no business
//! logic lives in the adapters.

pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigLoadError, GatewayConfig};
pub use dispatch::{route, Operation, RouteRequest};
pub use envelope::Envelope;
pub use error::{HandlerError, HandlerResult};
pub use state::Gateway;
