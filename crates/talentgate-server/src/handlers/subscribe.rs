//! Notification subscriptions.

use serde::Serialize;

use talentgate_backends::{NotificationTopic, SubscribeRequest};

use crate::error::{HandlerError, HandlerResult};

/// Delivery protocol every subscription is forwarded with.
pub const SUBSCRIBE_PROTOCOL: &str = "email";

/// Error message for a missing email address.
pub const EMAIL_REQUIRED_MESSAGE: &str = "Email is required";

/// The backend's acknowledgement plus a human-readable confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionReceipt {
    pub message: String,
    /// The backend's reply, unmodified: a subscription ARN or a
    /// pending-confirmation marker.
    pub result: String,
}

/// Subscribes an email address to the configured notification topic.
///
/// Presence of `email` is the only validation at this layer, checked
/// before any external call. Duplicate subscriptions are governed by
/// the backend's own idempotency; nothing is deduplicated locally.
pub async fn subscribe<N: NotificationTopic>(
    topic: &N,
    topic_arn: &str,
    email: Option<&str>,
) -> HandlerResult<SubscriptionReceipt> {
    let email = email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| HandlerError::Client(EMAIL_REQUIRED_MESSAGE.to_string()))?;

    let result = topic
        .subscribe(SubscribeRequest {
            protocol: SUBSCRIBE_PROTOCOL.to_string(),
            topic: topic_arn.to_string(),
            endpoint: email.to_string(),
        })
        .await?;

    Ok(SubscriptionReceipt {
        message: format!("Subscription requested for {email}. Check your inbox to confirm."),
        result,
    })
}
