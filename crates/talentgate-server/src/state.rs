//! Process-wide gateway state.

use std::sync::Arc;

use talentgate_backends::{BlobStore, NotificationTopic, RoleStore};

/// The process-wide, read-only client handles the handlers depend on,
/// plus the deployment-fixed topic identifier.
///
/// Created exactly once at process start and shared across every
/// in-flight request. The handles hold no per-call state, so
/// unsynchronized concurrent use is safe; nothing here is ever
/// replaced or torn down during the process's life.
///
/// Handlers receive these by injection rather than through a hidden
/// singleton, which keeps the dispatch logic testable with
/// substitutable fakes.
pub struct Gateway<B, R, N> {
    /// Object-storage handle used for grant issuance.
    pub blobs: Arc<B>,
    /// Role-table handle.
    pub roles: Arc<R>,
    /// Notification-topic handle.
    pub topic: Arc<N>,
    /// Topic identifier subscriptions are addressed to.
    pub topic_arn: String,
}

impl<B, R, N> Gateway<B, R, N>
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    pub fn new(blobs: Arc<B>, roles: Arc<R>, topic: Arc<N>, topic_arn: impl Into<String>) -> Self {
        Self {
            blobs,
            roles,
            topic,
            topic_arn: topic_arn.into(),
        }
    }
}

// Manual impl: deriving Clone would require B/R/N to be Clone, but
// only the Arcs are cloned.
impl<B, R, N> Clone for Gateway<B, R, N> {
    fn clone(&self) -> Self {
        Self {
            blobs: Arc::clone(&self.blobs),
            roles: Arc::clone(&self.roles),
            topic: Arc::clone(&self.topic),
            topic_arn: self.topic_arn.clone(),
        }
    }
}
