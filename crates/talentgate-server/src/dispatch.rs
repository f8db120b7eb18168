//! Request routing and dispatch.
//!
//! The route table is a closed set of operations matched by exact
//! prefix in a fixed order, replacing the substring matching of the
//! original deployment so no two routes can accidentally overlap. Both
//! hosting adapters funnel into [`route`], so the table exists exactly
//! once.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use talentgate_backends::{BlobStore, NotificationTopic, RoleStore};

use crate::envelope::Envelope;
use crate::error::HandlerError;
use crate::handlers;
use crate::state::Gateway;

/// Route segment for grant issuance.
pub const UPLOAD_GRANT_PATH: &str = "/getPresignedUrl";
/// Route segment for the role listing.
pub const LIST_ROLES_PATH: &str = "/getJobRoles";
/// Route prefix for role detail. The role identifier is read from the
/// `jobId` query parameter, not from the path segment; callers must
/// supply it explicitly (observed contract, preserved).
pub const ROLE_DETAIL_PREFIX: &str = "/jobs/";
/// Route for subscriptions.
pub const SUBSCRIBE_PATH: &str = "/subscribe";

/// An inbound HTTP-shaped request, constructed per call by a hosting
/// adapter and discarded once the matching handler returns.
///
/// `path` carries no query string; query parameters arrive decoded in
/// `query`.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// The closed set of routed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    IssueUploadGrant {
        filename: Option<String>,
        grouping_id: Option<String>,
    },
    ListRoles,
    GetRole {
        role_id: Option<String>,
    },
    Subscribe {
        email: Option<String>,
    },
}

/// Matches a request against the route table.
///
/// Rules are evaluated in fixed order; the first match wins. `None`
/// means no rule matched and the caller gets the fallback response.
pub fn resolve(req: &RouteRequest) -> Option<Operation> {
    let get = req.method.eq_ignore_ascii_case("GET");
    let post = req.method.eq_ignore_ascii_case("POST");

    if get && req.path == UPLOAD_GRANT_PATH {
        return Some(Operation::IssueUploadGrant {
            filename: req.query.get("name").cloned(),
            grouping_id: req.query.get("jobId").cloned(),
        });
    }
    if get && req.path == LIST_ROLES_PATH {
        return Some(Operation::ListRoles);
    }
    if get && req.path.starts_with(ROLE_DETAIL_PREFIX) {
        return Some(Operation::GetRole {
            role_id: req.query.get("jobId").cloned(),
        });
    }
    if post && req.path == SUBSCRIBE_PATH {
        return Some(Operation::Subscribe {
            email: email_from_body(req.body.as_deref()),
        });
    }

    None
}

/// Extracts the `email` field from a JSON request body. An absent,
/// unparseable, or non-string field is treated as a missing email,
/// which the subscribe handler rejects before any external call.
pub fn email_from_body(body: Option<&[u8]>) -> Option<String> {
    let body = body?;
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("email")?.as_str().map(str::to_string)
}

/// Serializes a success payload into a 200 envelope.
fn ok_json<T: Serialize>(payload: &T) -> Envelope {
    match serde_json::to_value(payload) {
        Ok(body) => Envelope::ok(body),
        Err(err) => {
            error!(error = %err, "response serialization failed");
            Envelope::error(500, json!({ "error": "failed to serialize response" }))
        }
    }
}

/// Executes one resolved operation against the gateway's backend
/// handles and wraps the outcome in the response envelope.
///
/// Handlers never propagate a failure past this point; every branch
/// produces a JSON envelope.
pub async fn dispatch<B, R, N>(gateway: &Gateway<B, R, N>, operation: Operation) -> Envelope
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    match operation {
        Operation::IssueUploadGrant {
            filename,
            grouping_id,
        } => {
            match handlers::issue_upload_grant(
                gateway.blobs.as_ref(),
                filename.as_deref(),
                grouping_id.as_deref(),
            )
            .await
            {
                Ok(grant) => Envelope::ok(json!({ "url": grant.url })),
                Err(err) => err.into_envelope(),
            }
        }
        Operation::ListRoles => match handlers::list_roles(gateway.roles.as_ref()).await {
            Ok(roles) => ok_json(&roles),
            Err(err) => err.into_envelope(),
        },
        Operation::GetRole { role_id } => {
            let Some(role_id) = role_id.filter(|id| !id.is_empty()) else {
                return HandlerError::Client("jobId query parameter is required".to_string())
                    .into_envelope();
            };
            match handlers::get_role(gateway.roles.as_ref(), &role_id).await {
                Ok(role) => ok_json(&role),
                Err(err) => err.into_envelope(),
            }
        }
        Operation::Subscribe { email } => {
            match handlers::subscribe(
                gateway.topic.as_ref(),
                &gateway.topic_arn,
                email.as_deref(),
            )
            .await
            {
                Ok(receipt) => ok_json(&receipt),
                Err(err) => err.into_envelope(),
            }
        }
    }
}

/// Routes one inbound request: logs it, resolves the operation, and
/// dispatches it; unmatched requests get the fixed 404 fallback.
pub async fn route<B, R, N>(gateway: &Gateway<B, R, N>, request: RouteRequest) -> Envelope
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    // Observability hook only; dispatch never depends on it.
    info!(
        method = %request.method,
        path = %request.path,
        payload = %request
            .body
            .as_deref()
            .map(String::from_utf8_lossy)
            .unwrap_or_default(),
        "inbound request"
    );

    match resolve(&request) {
        Some(operation) => dispatch(gateway, operation).await,
        None => Envelope::route_not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use talentgate_backends::{MemoryBlobStore, MemoryRoleStore, MemoryTopic};

    const TOPIC: &str = "arn:topic:role-updates";

    fn test_gateway() -> Gateway<MemoryBlobStore, MemoryRoleStore, MemoryTopic> {
        Gateway::new(
            Arc::new(MemoryBlobStore::new("cv-bucket")),
            Arc::new(MemoryRoleStore::new()),
            Arc::new(MemoryTopic::new()),
            TOPIC,
        )
    }

    fn get(path: &str, query: &[(&str, &str)]) -> RouteRequest {
        RouteRequest {
            method: "GET".to_string(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        }
    }

    fn post(path: &str, body: &str) -> RouteRequest {
        RouteRequest {
            method: "POST".to_string(),
            path: path.to_string(),
            query: HashMap::new(),
            body: Some(body.as_bytes().to_vec()),
        }
    }

    #[tokio::test]
    async fn grant_route_returns_url_scoped_to_key() {
        let gateway = test_gateway();
        let env = route(
            &gateway,
            get(UPLOAD_GRANT_PATH, &[("name", "cv.pdf"), ("jobId", "role-3")]),
        )
        .await;

        assert_eq!(env.status, 200);
        let url = env.body["url"].as_str().unwrap();
        assert!(url.contains("/uploads/role-3/cv.pdf"));
    }

    #[tokio::test]
    async fn grant_route_without_params_uses_defaults() {
        let gateway = test_gateway();
        let env = route(&gateway, get(UPLOAD_GRANT_PATH, &[])).await;

        assert_eq!(env.status, 200);
        let url = env.body["url"].as_str().unwrap();
        assert!(url.contains("/uploads/unknown/"));
        assert!(url.contains(".pdf"));
    }

    #[tokio::test]
    async fn grant_backend_failure_maps_to_500_with_message() {
        let gateway = test_gateway();
        gateway.blobs.set_outage(Some("signing key rejected".to_string()));

        let env = route(&gateway, get(UPLOAD_GRANT_PATH, &[])).await;
        assert_eq!(env.status, 500);
        assert!(env.body["error"]
            .as_str()
            .unwrap()
            .contains("signing key rejected"));
    }

    #[tokio::test]
    async fn list_route_returns_all_roles() {
        let gateway = test_gateway();
        gateway.roles.insert_role("role-1", "SRE", "Keeps it running");
        gateway.roles.insert_role("role-2", "Data Engineer", "Moves the data");

        let env = route(&gateway, get(LIST_ROLES_PATH, &[])).await;
        assert_eq!(env.status, 200);
        let roles = env.body.as_array().unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().all(|r| r["id"].is_string()
            && r["title"].is_string()
            && r["description"].is_string()));
    }

    #[tokio::test]
    async fn detail_route_reads_id_from_query_not_path() {
        let gateway = test_gateway();
        gateway.roles.insert_role("role-1", "SRE", "Keeps it running");

        // Path segment says role-2; the query parameter wins.
        let env = route(&gateway, get("/jobs/role-2", &[("jobId", "role-1")])).await;
        assert_eq!(env.status, 200);
        assert_eq!(env.body["id"], "role-1");
        assert_eq!(env.body["title"], "SRE");
    }

    #[tokio::test]
    async fn detail_route_without_query_id_is_a_client_error() {
        let gateway = test_gateway();
        let env = route(&gateway, get("/jobs/role-1", &[])).await;
        assert_eq!(env.status, 400);
        assert!(env.body["error"].as_str().unwrap().contains("jobId"));
    }

    #[tokio::test]
    async fn detail_route_for_absent_id_is_404_job_not_found() {
        let gateway = test_gateway();
        let env = route(&gateway, get("/jobs/x", &[("jobId", "absent-id")])).await;
        assert_eq!(env.status, 404);
        assert_eq!(env.body, json!({ "message": "Job not found" }));
    }

    #[tokio::test]
    async fn subscribe_route_returns_message_and_result() {
        let gateway = test_gateway();
        let env = route(
            &gateway,
            post(SUBSCRIBE_PATH, r#"{ "email": "visitor@example.com" }"#),
        )
        .await;

        assert_eq!(env.status, 200);
        assert_eq!(env.body["result"], "pending confirmation");
        assert!(env.body["message"]
            .as_str()
            .unwrap()
            .contains("visitor@example.com"));
        assert_eq!(gateway.topic.call_count(), 1);
    }

    #[tokio::test]
    async fn subscribe_without_email_is_400_before_any_external_call() {
        let gateway = test_gateway();

        for body in ["{}", r#"{ "email": "" }"#, "not json"] {
            let env = route(&gateway, post(SUBSCRIBE_PATH, body)).await;
            assert_eq!(env.status, 400, "body: {body}");
            assert_eq!(env.body["error"], "Email is required");
        }
        assert_eq!(gateway.topic.call_count(), 0);
    }

    #[tokio::test]
    async fn unmatched_routes_get_the_fixed_fallback() {
        let gateway = test_gateway();

        let cases = [
            get("/nope", &[]),
            get("/nope", &[("jobId", "role-1")]),
            post(UPLOAD_GRANT_PATH, ""),
            get(SUBSCRIBE_PATH, &[]),
            RouteRequest {
                method: "DELETE".to_string(),
                path: LIST_ROLES_PATH.to_string(),
                ..Default::default()
            },
        ];
        for req in cases {
            let label = format!("{} {}", req.method, req.path);
            let env = route(&gateway, req).await;
            assert_eq!(env.status, 404, "{label}");
            assert_eq!(env.body, json!({ "error": "Invalid route or method" }), "{label}");
        }
    }

    #[tokio::test]
    async fn every_branch_carries_the_cors_origin_header() {
        let gateway = test_gateway();
        gateway.roles.insert_role("role-1", "SRE", "Keeps it running");

        let requests = vec![
            get(UPLOAD_GRANT_PATH, &[]),
            get(LIST_ROLES_PATH, &[]),
            get("/jobs/role-1", &[("jobId", "role-1")]),
            get("/jobs/role-1", &[("jobId", "absent")]),
            get("/jobs/role-1", &[]),
            post(SUBSCRIBE_PATH, "{}"),
            post(SUBSCRIBE_PATH, r#"{ "email": "a@b.c" }"#),
            get("/definitely-not-a-route", &[]),
        ];
        for req in requests {
            let label = format!("{} {}", req.method, req.path);
            let env = route(&gateway, req).await;
            assert_eq!(
                env.header("Access-Control-Allow-Origin"),
                Some("*"),
                "{label}"
            );
        }
    }

    #[test]
    fn email_extraction_handles_bad_bodies() {
        assert_eq!(email_from_body(None), None);
        assert_eq!(email_from_body(Some(b"garbage")), None);
        assert_eq!(email_from_body(Some(b"{}")), None);
        assert_eq!(email_from_body(Some(br#"{ "email": 42 }"#)), None);
        assert_eq!(
            email_from_body(Some(br#"{ "email": "a@b.c" }"#)),
            Some("a@b.c".to_string())
        );
    }
}
