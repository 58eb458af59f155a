//! mb command - Make a bucket

use clap::Args;

use s3ctl_client::S3Client;
use s3ctl_core::{StorageOps as _, Target, SCHEME};

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create a bucket
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Bucket to create, as a name or s3://BUCKET URI
    pub target: String,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, client: &S3Client, formatter: &Formatter) -> ExitCode {
    let target = match Target::parse(&args.target) {
        Ok(target) => target,
        Err(e) => return report(formatter, &e),
    };
    let bucket = match target.bucket_name() {
        Ok(bucket) => bucket,
        Err(e) => return report(formatter, &e),
    };

    match client.create_bucket(bucket).await {
        Ok(()) => {
            formatter.success(&format!("Bucket '{SCHEME}{bucket}' created"));
            ExitCode::Success
        }
        Err(e) => report(formatter, &e),
    }
}
