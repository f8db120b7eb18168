//! Upload-grant issuance.

use talentgate_backends::BlobStore;

use crate::error::HandlerResult;

/// Content type every grant is fixed to.
pub const UPLOAD_CONTENT_TYPE: &str = "application/pdf";

/// Grant time-to-live, enforced by the storage backend after issuance.
pub const GRANT_TTL_SECONDS: u64 = 60;

/// Grouping identifier used when the caller supplies none, keeping
/// ungrouped uploads addressable under a single key prefix.
pub const DEFAULT_GROUPING_ID: &str = "unknown";

/// Key prefix for uploaded objects.
const KEY_PREFIX: &str = "uploads";

/// A freshly issued, never persisted upload grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    /// Write-only pre-authorized URL scoped to one object key.
    pub url: String,
    /// Seconds until the grant expires.
    pub expires_in_seconds: u64,
}

/// Resolves the caller-supplied filename, synthesizing a timestamped
/// `.pdf` name when absent or empty. Calls spaced by at least one
/// millisecond yield distinct generated names.
pub fn resolve_filename(name: Option<&str>) -> String {
    match name.filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("{}.pdf", chrono::Utc::now().timestamp_millis()),
    }
}

/// Derives the object key for a filename and optional grouping
/// identifier: `uploads/{groupingId}/{filename}`.
///
/// There is no collision avoidance beyond caller-supplied filename
/// uniqueness; a reused (filename, grouping) pair scopes a new grant
/// to the same key, and using it overwrites the earlier object.
pub fn object_key(filename: &str, grouping_id: Option<&str>) -> String {
    let grouping = grouping_id
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GROUPING_ID);
    format!("{KEY_PREFIX}/{grouping}/{filename}")
}

/// Issues a time-scoped write grant for one object key.
///
/// Delegates to the storage backend and performs no write itself; any
/// backend failure is surfaced unretried as an upstream error.
pub async fn issue_upload_grant<B: BlobStore>(
    blobs: &B,
    filename: Option<&str>,
    grouping_id: Option<&str>,
) -> HandlerResult<UploadGrant> {
    let filename = resolve_filename(filename);
    let key = object_key(&filename, grouping_id);

    let grant = blobs
        .presign_put(&key, UPLOAD_CONTENT_TYPE, GRANT_TTL_SECONDS)
        .await?;

    Ok(UploadGrant {
        url: grant.url,
        expires_in_seconds: grant.expires_in_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use talentgate_backends::MemoryBlobStore;

    #[test]
    fn object_key_is_grouped_under_uploads() {
        assert_eq!(
            object_key("cv.pdf", Some("role-7")),
            "uploads/role-7/cv.pdf"
        );
    }

    #[test]
    fn absent_grouping_defaults_to_unknown() {
        assert_eq!(object_key("cv.pdf", None), "uploads/unknown/cv.pdf");
        assert_eq!(object_key("cv.pdf", Some("")), "uploads/unknown/cv.pdf");
    }

    #[test]
    fn generated_filename_ends_in_pdf_and_is_time_distinct() {
        let first = resolve_filename(None);
        assert!(first.ends_with(".pdf"));

        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = resolve_filename(None);
        assert_ne!(first, second);
    }

    #[test]
    fn empty_filename_is_treated_as_absent() {
        assert!(resolve_filename(Some("")).ends_with(".pdf"));
        assert_eq!(resolve_filename(Some("resume.pdf")), "resume.pdf");
    }

    #[tokio::test]
    async fn grant_is_scoped_to_the_exact_key_with_60s_expiry() {
        let blobs = MemoryBlobStore::new("cv-bucket");
        let grant = issue_upload_grant(&blobs, Some("cv.pdf"), Some("role-1"))
            .await
            .unwrap();

        assert!(grant.url.contains("/uploads/role-1/cv.pdf"));
        assert!(grant.url.contains("content-type=application/pdf"));
        assert_eq!(grant.expires_in_seconds, GRANT_TTL_SECONDS);
    }

    #[tokio::test]
    async fn backend_failure_is_surfaced_as_upstream() {
        let blobs = MemoryBlobStore::new("cv-bucket");
        blobs.set_outage(Some("credentials expired".to_string()));

        let err = issue_upload_grant(&blobs, Some("cv.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Upstream(_)));
    }
}
