//! Role directory: list and point lookup over the job-role table.

use serde::Serialize;

use talentgate_backends::{BackendError, RoleItem, RoleStore};

use crate::error::{HandlerError, HandlerResult};

/// Message returned when a point lookup finds no item.
pub const JOB_NOT_FOUND_MESSAGE: &str = "Job not found";

/// Partition key field in the table's item encoding.
const FIELD_ID: &str = "jobId";
const FIELD_TITLE: &str = "title";
const FIELD_DESCRIPTION: &str = "description";

/// A job-role record projected from the table's native encoding.
/// Immutable once read; owned by the external table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Projects a raw table item into a `Role`.
///
/// An item missing any of the three string fields is upstream data the
/// gateway cannot serve, not a caller mistake.
fn project_role(item: &RoleItem) -> HandlerResult<Role> {
    let field = |name: &str| -> HandlerResult<String> {
        item.get(name)
            .and_then(|attr| attr.as_s())
            .map(str::to_string)
            .ok_or_else(|| {
                HandlerError::Upstream(BackendError::malformed_item(format!(
                    "role item is missing string field '{name}'"
                )))
            })
    };

    Ok(Role {
        id: field(FIELD_ID)?,
        title: field(FIELD_TITLE)?,
        description: field(FIELD_DESCRIPTION)?,
    })
}

/// Lists every role in the table.
///
/// The scan is exhausted page by page before returning, so a
/// paginating backend never silently truncates the result. No ordering
/// guarantee is made; scan order is backend-defined. An empty table
/// yields an empty list, not an error.
pub async fn list_roles<R: RoleStore>(roles: &R) -> HandlerResult<Vec<Role>> {
    let mut out = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = roles.scan_page(cursor.as_deref()).await?;
        for item in &page.items {
            out.push(project_role(item)?);
        }
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(out)
}

/// Fetches one role by partition key.
///
/// A missing item is a distinct `NotFound`, which the dispatcher maps
/// to 404 with `{ "message": "Job not found" }`.
pub async fn get_role<R: RoleStore>(roles: &R, id: &str) -> HandlerResult<Role> {
    match roles.get_item(id).await? {
        Some(item) => project_role(&item),
        None => Err(HandlerError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentgate_backends::{AttrValue, MemoryRoleStore};

    #[tokio::test]
    async fn list_returns_every_item_across_pages() {
        let store = MemoryRoleStore::with_page_size(2);
        for i in 0..7 {
            store.insert_role(&format!("role-{i}"), &format!("Title {i}"), "Desc");
        }

        let roles = list_roles(&store).await.unwrap();
        assert_eq!(roles.len(), 7);
        assert!(roles.iter().all(|r| !r.title.is_empty()));
    }

    #[tokio::test]
    async fn list_of_empty_table_is_empty_not_an_error() {
        let store = MemoryRoleStore::new();
        let roles = list_roles(&store).await.unwrap();
        assert!(roles.is_empty());
    }

    #[tokio::test]
    async fn get_returns_the_exact_item_fields() {
        let store = MemoryRoleStore::new();
        store.insert_role("role-1", "Platform Engineer", "Owns the platform");

        let role = get_role(&store, "role-1").await.unwrap();
        assert_eq!(
            role,
            Role {
                id: "role-1".to_string(),
                title: "Platform Engineer".to_string(),
                description: "Owns the platform".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn get_absent_id_is_not_found() {
        let store = MemoryRoleStore::new();
        let err = get_role(&store, "absent-id").await.unwrap_err();
        match err {
            HandlerError::NotFound(message) => assert_eq!(message, "Job not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_item_is_an_upstream_error() {
        let store = MemoryRoleStore::new();
        let mut item = RoleItem::new();
        item.insert("jobId".to_string(), AttrValue::S("role-1".to_string()));
        // title and description missing
        store.insert_item("role-1", item);

        let err = get_role(&store, "role-1").await.unwrap_err();
        assert!(matches!(err, HandlerError::Upstream(_)));
    }

    #[tokio::test]
    async fn table_outage_is_an_upstream_error() {
        let store = MemoryRoleStore::new();
        store.set_outage(Some("throttled".to_string()));

        assert!(matches!(
            list_roles(&store).await.unwrap_err(),
            HandlerError::Upstream(_)
        ));
    }
}
