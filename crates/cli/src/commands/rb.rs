//! rb command - Remove a bucket
//!
//! The service refuses to remove a non-empty bucket; that failure comes
//! back as a conflict naming the bucket.

use clap::Args;

use s3ctl_client::S3Client;
use s3ctl_core::{StorageOps as _, Target, SCHEME};

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Remove a bucket
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Bucket to remove, as a name or s3://BUCKET URI
    pub target: String,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, client: &S3Client, formatter: &Formatter) -> ExitCode {
    let target = match Target::parse(&args.target) {
        Ok(target) => target,
        Err(e) => return report(formatter, &e),
    };
    let bucket = match target.bucket_name() {
        Ok(bucket) => bucket,
        Err(e) => return report(formatter, &e),
    };

    match client.delete_bucket(bucket).await {
        Ok(()) => {
            formatter.success(&format!("Bucket '{SCHEME}{bucket}' removed"));
            ExitCode::Success
        }
        Err(e) => report(formatter, &e),
    }
}
