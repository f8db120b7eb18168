//! Backend trait definitions.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::BackendResult;

/// An attribute value in the role table's native item encoding.
///
/// The table stores every field as a tagged scalar; the gateway only
/// ever reads string attributes but keeps the encoding explicit so the
/// projection into plain records stays in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// String attribute.
    S(String),
    /// Numeric attribute, kept in its wire form.
    N(String),
}

impl AttrValue {
    /// Returns the string payload, or `None` for non-string attributes.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            AttrValue::N(_) => None,
        }
    }
}

/// A raw item as stored in the role table: field name to attribute value.
pub type RoleItem = HashMap<String, AttrValue>;

/// One page of a table scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Items in this page, in backend-defined order.
    pub items: Vec<RoleItem>,
    /// Opaque cursor for the next page; `None` when the scan is exhausted.
    pub next: Option<String>,
}

/// A time-scoped, write-only pre-authorized URL for one object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPut {
    /// The capability-bearing URL.
    pub url: String,
    /// Seconds until the grant expires, enforced by the backend.
    pub expires_in_seconds: u64,
}

/// A subscribe request forwarded to the notification-topic service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    /// Delivery protocol, fixed to `"email"` by the gateway.
    pub protocol: String,
    /// Topic identifier, fixed by deployment configuration.
    pub topic: String,
    /// The address to subscribe.
    pub endpoint: String,
}

/// Object-storage seam.
///
/// Implementations must be thread-safe; the gateway holds one handle
/// per process and shares it across concurrent requests.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Requests a write-only pre-authorized URL scoped to exactly `key`.
    ///
    /// No object is written by this call; the backend only records the
    /// not-yet-used grant.
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in_seconds: u64,
    ) -> BackendResult<PresignedPut>;
}

/// Role-table seam.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Reads one page of a full-table scan starting at `cursor`.
    ///
    /// Callers that need the whole table must follow `ScanPage::next`
    /// until it is `None`; a single page is not guaranteed to be
    /// complete.
    async fn scan_page(&self, cursor: Option<&str>) -> BackendResult<ScanPage>;

    /// Point lookup by partition key. Returns `Ok(None)` when the table
    /// holds no item for `id`.
    async fn get_item(&self, id: &str) -> BackendResult<Option<RoleItem>>;
}

/// Notification-topic seam.
#[async_trait]
pub trait NotificationTopic: Send + Sync + 'static {
    /// Forwards a subscribe request and returns the backend's
    /// acknowledgement unmodified (a subscription ARN or a
    /// pending-confirmation marker).
    ///
    /// Duplicate subscriptions are the backend's concern; the gateway
    /// performs no local deduplication.
    async fn subscribe(&self, request: SubscribeRequest) -> BackendResult<String>;
}
