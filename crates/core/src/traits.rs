//! StorageOps trait definition and operation result types
//!
//! This trait defines the interface for S3-compatible storage operations.
//! It keeps the CLI decoupled from the wire-level client implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One entry of a bucket or object listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Object key or bucket name
    pub key: String,

    /// Size in bytes (None for buckets)
    pub size: Option<u64>,

    /// Last modified (objects) or creation (buckets) timestamp
    pub last_modified: Option<DateTime<Utc>>,

    /// ETag (usually MD5 for single-part uploads; None for buckets)
    pub etag: Option<String>,
}

impl ListingEntry {
    /// Create an entry for a bucket
    pub fn bucket(name: impl Into<String>, created: Option<DateTime<Utc>>) -> Self {
        Self {
            key: name.into(),
            size: None,
            last_modified: created,
            etag: None,
        }
    }

    /// Create an entry for an object
    pub fn object(
        key: impl Into<String>,
        size: u64,
        last_modified: Option<DateTime<Utc>>,
        etag: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            size: Some(size),
            last_modified,
            etag,
        }
    }
}

/// Lazily decoded sequence of listing entries, in service order
///
/// Consume-once: restartable only by re-issuing the request.
pub type EntryIter = Box<dyn Iterator<Item = Result<ListingEntry>> + Send>;

/// Result of a list operation: one page of entries plus its envelope
pub struct Listing {
    /// Entries in the order the service returned them
    pub entries: EntryIter,

    /// Whether the result is truncated (more entries available)
    pub truncated: bool,

    /// Marker for the next page, when the service provided one; when absent
    /// callers advance with the last key of the page
    pub next_marker: Option<String>,
}

impl std::fmt::Debug for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listing")
            .field("truncated", &self.truncated)
            .field("next_marker", &self.next_marker)
            .finish_non_exhaustive()
    }
}

/// Result of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    /// Bytes actually transferred
    pub size: u64,

    /// Stored URI for uploads, destination path for downloads
    pub target: String,
}

/// Trait for S3-compatible storage operations
///
/// Implemented by the wire client; commands depend only on this interface.
#[async_trait]
pub trait StorageOps: Send + Sync {
    /// List all buckets owned by the credentials
    async fn list_all_buckets(&self) -> Result<Listing>;

    /// List one page of objects in a bucket, starting after `marker`
    async fn list_bucket(&self, bucket: &str, marker: Option<&str>) -> Result<Listing>;

    /// Create a bucket
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload a local file as an object
    async fn put_object(&self, source: &Path, bucket: &str, key: &str) -> Result<TransferResult>;

    /// Download an object to a local file
    async fn get_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<TransferResult>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
