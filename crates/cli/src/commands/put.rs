//! put command - Upload files
//!
//! The last positional argument is the destination URI; everything before
//! it is a local source file. Uploads run one at a time and stop at the
//! first failure.

use std::path::PathBuf;

use clap::Args;

use s3ctl_client::{resolve_put_targets, S3Client};
use s3ctl_core::{Error, Result, Settings, StorageOps as _, Target};

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Upload files into a bucket
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Source file(s) followed by the destination s3://BUCKET[/KEY] URI
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    pub paths: Vec<String>,
}

/// Execute the put command
pub async fn execute(
    args: PutArgs,
    client: &S3Client,
    settings: &Settings,
    formatter: &Formatter,
) -> ExitCode {
    let (sources, target) = match split_paths(&args.paths) {
        Ok(split) => split,
        Err(e) => return report(formatter, &e),
    };
    let uri = match target.uri() {
        Ok(uri) => uri,
        Err(e) => return report(formatter, &e),
    };
    let bucket = uri.bucket_name();

    let uploads = match resolve_put_targets(&sources, uri, settings.force) {
        Ok(uploads) => uploads,
        Err(e) => return report(formatter, &e),
    };

    for (source, key) in uploads {
        match client.put_object(&source, bucket, &key).await {
            Ok(result) => formatter.success(&format!(
                "File '{}' stored as {} ({} bytes)",
                source.display(),
                result.target,
                result.size
            )),
            Err(e) => return report(formatter, &e),
        }
    }

    ExitCode::Success
}

/// Split the positional list into source paths and the trailing target.
fn split_paths(paths: &[String]) -> Result<(Vec<PathBuf>, Target)> {
    let (target, sources) = paths
        .split_last()
        .filter(|(_, sources)| !sources.is_empty())
        .ok_or_else(|| {
            Error::Parameter("Expecting one or more source files and a target URI".into())
        })?;
    let target = Target::parse(target)?;
    Ok((sources.iter().map(PathBuf::from).collect(), target))
}
