//! talentgate-backends: external-system seams
//!
//! This crate defines the interfaces the gateway uses to talk to its
//! three external collaborators, plus in-memory implementations for
//! tests and local deployments:
//! - `BlobStore` - issues pre-authorized upload URLs against object storage
//! - `RoleStore` - scan and point lookup over the job-role table
//! - `NotificationTopic` - forwards subscribe requests to a topic service
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            talentgate-backends               │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs  - BlobStore / RoleStore /        │
//! │               NotificationTopic traits       │
//! │  memory.rs  - In-memory implementations      │
//! │  error.rs   - BackendError                   │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use error::{BackendError, BackendResult};
pub use memory::{MemoryBlobStore, MemoryRoleStore, MemoryTopic};
pub use traits::{
    AttrValue, BlobStore, NotificationTopic, PresignedPut, RoleItem, RoleStore, ScanPage,
    SubscribeRequest,
};
