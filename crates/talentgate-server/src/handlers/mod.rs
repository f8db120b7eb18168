//! Operation handlers.
//!
//! One module per routed operation. Each handler performs exactly one
//! external call against an injected backend handle and returns a
//! tagged result; the dispatcher turns that into the response
//! envelope.

pub mod grant;
pub mod roles;
pub mod subscribe;

pub use grant::{issue_upload_grant, UploadGrant};
pub use roles::{get_role, list_roles, Role};
pub use subscribe::{subscribe, SubscriptionReceipt};
