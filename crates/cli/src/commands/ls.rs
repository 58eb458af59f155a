//! ls command - List objects in a bucket
//!
//! Without a target this falls back to listing buckets, mirroring `lb`.
//! With a bucket it walks truncated listings until the service reports
//! the end of the key space.

use clap::Args;

use s3ctl_client::S3Client;
use s3ctl_core::{Result, StorageOps, Target};

use super::{lb, report};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List objects in a bucket, or all buckets when no target is given
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Bucket to list, as a name or s3://BUCKET URI
    pub target: Option<String>,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, client: &S3Client, formatter: &Formatter) -> ExitCode {
    let Some(target) = args.target else {
        return lb::execute(lb::LbArgs {}, client, formatter).await;
    };

    let bucket = match Target::parse(&target).and_then(|t| t.bucket_name().map(String::from)) {
        Ok(bucket) => bucket,
        Err(e) => return report(formatter, &e),
    };

    match list_objects(client, &bucket, formatter).await {
        Ok(()) => ExitCode::Success,
        Err(e) => report(formatter, &e),
    }
}

/// Print every object in a bucket, following truncated listings to the end.
pub(super) async fn list_objects(
    client: &impl StorageOps,
    bucket: &str,
    formatter: &Formatter,
) -> Result<()> {
    let mut marker: Option<String> = None;
    loop {
        let listing = client.list_bucket(bucket, marker.as_deref()).await?;

        let mut last_key = None;
        for entry in listing.entries {
            let entry = entry?;
            formatter.println(&formatter.object_line(bucket, &entry));
            last_key = Some(entry.key);
        }

        if !listing.truncated {
            return Ok(());
        }
        // Most services omit NextMarker; the last key seen advances the scan.
        marker = listing.next_marker.or(last_key);
        if marker.is_none() {
            return Ok(());
        }
    }
}
