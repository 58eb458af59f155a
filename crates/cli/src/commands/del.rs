//! del command - Delete an object

use clap::Args;

use s3ctl_client::S3Client;
use s3ctl_core::{StorageOps as _, Target, SCHEME};

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete an object
#[derive(Args, Debug)]
pub struct DelArgs {
    /// Object URI (s3://BUCKET/KEY)
    pub uri: String,
}

/// Execute the del command
pub async fn execute(args: DelArgs, client: &S3Client, formatter: &Formatter) -> ExitCode {
    let target = match Target::parse(&args.uri) {
        Ok(target) => target,
        Err(e) => return report(formatter, &e),
    };
    let (bucket, key) = match target.object() {
        Ok(pair) => pair,
        Err(e) => return report(formatter, &e),
    };

    match client.delete_object(bucket, key).await {
        Ok(()) => {
            formatter.success(&format!("Object {SCHEME}{bucket}/{key} deleted"));
            ExitCode::Success
        }
        Err(e) => report(formatter, &e),
    }
}
