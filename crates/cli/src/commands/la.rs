//! la command - List all objects in all buckets
//!
//! Enumerates the account's buckets first, then lists each one in turn
//! under a header line naming the bucket. A bucket that fails to list
//! reports its error and the walk moves on to the next one; the exit
//! code reflects the worst failure seen.

use clap::Args;

use s3ctl_core::StorageOps;

use super::{ls, report};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List all objects in all buckets
#[derive(Args, Debug)]
pub struct LaArgs {}

/// Execute the la command
pub async fn execute(
    _args: LaArgs,
    client: &impl StorageOps,
    formatter: &Formatter,
) -> ExitCode {
    let listing = match client.list_all_buckets().await {
        Ok(listing) => listing,
        Err(e) => return report(formatter, &e),
    };

    // Collect names up front; the per-bucket listings reuse the client.
    let mut buckets = Vec::new();
    for entry in listing.entries {
        match entry {
            Ok(entry) => buckets.push(entry.key),
            Err(e) => return report(formatter, &e),
        }
    }

    let mut worst = ExitCode::Success;
    for bucket in buckets {
        formatter.println(&format!("Bucket '{bucket}':"));
        if let Err(e) = ls::list_objects(client, &bucket, formatter).await {
            let code = report(formatter, &e);
            if code.as_i32() > worst.as_i32() {
                worst = code;
            }
        }
        // Sections are separated by a blank line, failed ones included.
        formatter.println("");
    }

    worst
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use s3ctl_core::{Error, Listing, ListingEntry, Result, StorageOps, TransferResult};

    use super::*;

    /// Scripted backend: buckets named `locked` deny listing, the rest
    /// serve one object.
    struct ScriptedStore {
        buckets: Vec<&'static str>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedStore {
        fn new(buckets: &[&'static str]) -> Self {
            Self {
                buckets: buckets.to_vec(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    fn page(entries: Vec<ListingEntry>) -> Listing {
        Listing {
            entries: Box::new(entries.into_iter().map(Ok)),
            truncated: false,
            next_marker: None,
        }
    }

    #[async_trait]
    impl StorageOps for ScriptedStore {
        async fn list_all_buckets(&self) -> Result<Listing> {
            let entries = self
                .buckets
                .iter()
                .map(|name| ListingEntry::bucket(*name, None))
                .collect();
            Ok(page(entries))
        }

        async fn list_bucket(&self, bucket: &str, _marker: Option<&str>) -> Result<Listing> {
            self.requested.lock().unwrap().push(bucket.to_string());
            if bucket == "locked" {
                return Err(Error::AccessDenied(bucket.to_string()));
            }
            Ok(page(vec![ListingEntry::object("a.txt", 1, None, None)]))
        }

        async fn create_bucket(&self, _bucket: &str) -> Result<()> {
            unimplemented!()
        }

        async fn delete_bucket(&self, _bucket: &str) -> Result<()> {
            unimplemented!()
        }

        async fn put_object(
            &self,
            _source: &std::path::Path,
            _bucket: &str,
            _key: &str,
        ) -> Result<TransferResult> {
            unimplemented!()
        }

        async fn get_object(
            &self,
            _bucket: &str,
            _key: &str,
            _dest: &std::path::Path,
        ) -> Result<TransferResult> {
            unimplemented!()
        }

        async fn delete_object(&self, _bucket: &str, _key: &str) -> Result<()> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_walk_continues_past_a_denied_bucket() {
        let store = ScriptedStore::new(&["locked", "open"]);
        let formatter = Formatter::default();

        let code = execute(LaArgs {}, &store, &formatter).await;

        // The denied bucket sets the exit code but does not stop the walk.
        assert_eq!(code, ExitCode::AuthError);
        let requested = store.requested.lock().unwrap();
        assert_eq!(*requested, ["locked", "open"]);
    }

    #[tokio::test]
    async fn test_walk_with_no_failures_succeeds() {
        let store = ScriptedStore::new(&["open"]);
        let formatter = Formatter::default();

        let code = execute(LaArgs {}, &store, &formatter).await;

        assert_eq!(code, ExitCode::Success);
        assert_eq!(*store.requested.lock().unwrap(), ["open"]);
    }
}
