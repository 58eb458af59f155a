//! lb command - List all buckets
//!
//! Prints one line per bucket owned by the configured account.

use clap::Args;

use s3ctl_client::S3Client;
use s3ctl_core::StorageOps as _;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List all buckets
#[derive(Args, Debug)]
pub struct LbArgs {}

/// Execute the lb command
pub async fn execute(_args: LbArgs, client: &S3Client, formatter: &Formatter) -> ExitCode {
    let listing = match client.list_all_buckets().await {
        Ok(listing) => listing,
        Err(e) => return report(formatter, &e),
    };

    for entry in listing.entries {
        match entry {
            Ok(entry) => formatter.println(&formatter.bucket_line(&entry)),
            Err(e) => return report(formatter, &e),
        }
    }

    ExitCode::Success
}
