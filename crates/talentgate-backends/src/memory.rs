//! In-memory backend implementations.
//!
//! These back the local deployment and every test. They are safe for
//! unsynchronized concurrent use (DashMap plus atomics) and hold no
//! per-call state, matching the lifecycle the gateway expects from its
//! process-wide client handles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{BackendError, BackendResult};
use crate::traits::{
    AttrValue, BlobStore, NotificationTopic, PresignedPut, RoleItem, RoleStore, ScanPage,
    SubscribeRequest,
};

/// Injectable failure switch shared by the in-memory backends.
///
/// While an outage message is set, every call fails with
/// `BackendError::Unavailable`, which lets tests exercise the 500 path
/// without a real backend.
#[derive(Debug, Default)]
struct Outage(Mutex<Option<String>>);

impl Outage {
    fn check(&self) -> BackendResult<()> {
        let guard = self
            .0
            .lock()
            .map_err(|_| BackendError::unavailable("outage lock poisoned"))?;
        match guard.as_ref() {
            Some(message) => Err(BackendError::unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn set(&self, message: Option<String>) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = message;
        }
    }
}

/// In-memory object storage.
///
/// Grants are fabricated as bucket-scoped URLs embedding the object
/// key and expiry, which is enough for callers (and tests) to verify
/// exactly what the grant is scoped to. Nothing is ever written.
#[derive(Debug)]
pub struct MemoryBlobStore {
    bucket: String,
    outage: Outage,
}

impl MemoryBlobStore {
    /// Creates a store issuing grants against `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            outage: Outage::default(),
        }
    }

    /// Makes every subsequent call fail with the given message, or
    /// restores normal operation when `None`.
    pub fn set_outage(&self, message: Option<String>) {
        self.outage.set(message);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in_seconds: u64,
    ) -> BackendResult<PresignedPut> {
        self.outage.check()?;
        let url = format!(
            "https://{}.blob.local/{}?content-type={}&expires={}",
            self.bucket, key, content_type, expires_in_seconds
        );
        Ok(PresignedPut {
            url,
            expires_in_seconds,
        })
    }
}

/// Default scan page size for the in-memory role table.
const DEFAULT_SCAN_PAGE_SIZE: usize = 100;

/// In-memory role table keyed by partition key.
#[derive(Debug)]
pub struct MemoryRoleStore {
    items: DashMap<String, RoleItem>,
    page_size: usize,
    outage: Outage,
}

impl Default for MemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRoleStore {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            page_size: DEFAULT_SCAN_PAGE_SIZE,
            outage: Outage::default(),
        }
    }

    /// Creates an empty table that paginates scans at `page_size`
    /// items, so tests can exercise multi-page scans with small data.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::new()
        }
    }

    /// Inserts a well-formed role item.
    pub fn insert_role(&self, id: &str, title: &str, description: &str) {
        let mut item = RoleItem::new();
        item.insert("jobId".to_string(), AttrValue::S(id.to_string()));
        item.insert("title".to_string(), AttrValue::S(title.to_string()));
        item.insert(
            "description".to_string(),
            AttrValue::S(description.to_string()),
        );
        self.items.insert(id.to_string(), item);
    }

    /// Inserts a raw item, which may be missing fields. Used to test
    /// the gateway's handling of malformed table data.
    pub fn insert_item(&self, id: &str, item: RoleItem) {
        self.items.insert(id.to_string(), item);
    }

    /// Makes every subsequent call fail with the given message, or
    /// restores normal operation when `None`.
    pub fn set_outage(&self, message: Option<String>) {
        self.outage.set(message);
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn scan_page(&self, cursor: Option<&str>) -> BackendResult<ScanPage> {
        self.outage.check()?;

        // DashMap iteration order is arbitrary; sort keys so the
        // cursor stays meaningful across pages.
        let mut ids: Vec<String> = self.items.iter().map(|e| e.key().clone()).collect();
        ids.sort();

        // The cursor is the last key of the previous page, exclusive.
        let start = match cursor {
            Some(c) => ids.iter().position(|id| id.as_str() > c).unwrap_or(ids.len()),
            None => 0,
        };

        let page_ids = &ids[start..(start + self.page_size).min(ids.len())];
        let items = page_ids
            .iter()
            .filter_map(|id| self.items.get(id).map(|e| e.value().clone()))
            .collect();

        let next = if start + self.page_size < ids.len() {
            page_ids.last().cloned()
        } else {
            None
        };

        Ok(ScanPage { items, next })
    }

    async fn get_item(&self, id: &str) -> BackendResult<Option<RoleItem>> {
        self.outage.check()?;
        Ok(self.items.get(id).map(|e| e.value().clone()))
    }
}

/// Acknowledgement returned for email subscriptions, mirroring the
/// pending-confirmation marker the real topic service replies with.
pub const PENDING_CONFIRMATION: &str = "pending confirmation";

/// In-memory notification topic.
///
/// Records every forwarded request and counts calls so tests can
/// assert that client errors short-circuit before any external call.
#[derive(Debug, Default)]
pub struct MemoryTopic {
    subscriptions: DashMap<String, Vec<SubscribeRequest>>,
    calls: AtomicU64,
    outage: Outage,
}

impl MemoryTopic {
    /// Creates an empty topic service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscribe calls that reached this backend.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests recorded against `topic`, in arrival order.
    pub fn subscriptions(&self, topic: &str) -> Vec<SubscribeRequest> {
        self.subscriptions
            .get(topic)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// Makes every subsequent call fail with the given message, or
    /// restores normal operation when `None`.
    pub fn set_outage(&self, message: Option<String>) {
        self.outage.set(message);
    }
}

#[async_trait]
impl NotificationTopic for MemoryTopic {
    async fn subscribe(&self, request: SubscribeRequest) -> BackendResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outage.check()?;
        self.subscriptions
            .entry(request.topic.clone())
            .or_default()
            .push(request);
        Ok(PENDING_CONFIRMATION.to_string())
    }
}
