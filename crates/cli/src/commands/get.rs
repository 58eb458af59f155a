//! get command - Download an object
//!
//! Saves the object under its key by default; an explicit destination may
//! be a file name or an existing directory.

use std::path::PathBuf;

use clap::Args;

use s3ctl_client::S3Client;
use s3ctl_core::{StorageOps as _, Target, SCHEME};

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Download an object
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object URI (s3://BUCKET/KEY)
    pub uri: String,

    /// Destination file or directory (defaults to the object key)
    pub dest: Option<PathBuf>,
}

/// Execute the get command
pub async fn execute(args: GetArgs, client: &S3Client, formatter: &Formatter) -> ExitCode {
    let target = match Target::parse(&args.uri) {
        Ok(target) => target,
        Err(e) => return report(formatter, &e),
    };
    let (bucket, key) = match target.object() {
        Ok(pair) => pair,
        Err(e) => return report(formatter, &e),
    };

    let dest = resolve_dest(key, args.dest);
    match client.get_object(bucket, key, &dest).await {
        Ok(result) => {
            formatter.success(&format!(
                "Object {SCHEME}{bucket}/{key} saved as '{}' ({} bytes)",
                result.target, result.size
            ));
            ExitCode::Success
        }
        Err(e) => report(formatter, &e),
    }
}

/// Pick the local destination for a downloaded object.
///
/// A directory destination receives the object under its own key; the key
/// alone names the file when no destination is given.
fn resolve_dest(key: &str, dest: Option<PathBuf>) -> PathBuf {
    match dest {
        Some(path) if path.is_dir() => path.join(key),
        Some(path) => path,
        None => PathBuf::from(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dest_defaults_to_key() {
        assert_eq!(resolve_dest("app.log", None), PathBuf::from("app.log"));
        assert_eq!(
            resolve_dest("logs/app.log", None),
            PathBuf::from("logs/app.log")
        );
    }

    #[test]
    fn test_resolve_dest_explicit_file() {
        assert_eq!(
            resolve_dest("app.log", Some(PathBuf::from("saved.log"))),
            PathBuf::from("saved.log")
        );
    }

    #[test]
    fn test_resolve_dest_directory_joins_key() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_dest("app.log", Some(dir.path().to_path_buf()));
        assert_eq!(resolved, dir.path().join("app.log"));
    }

    #[test]
    fn test_resolve_dest_missing_path_is_a_file() {
        // A path that does not exist yet is treated as the file to create.
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-yet-created");
        let resolved = resolve_dest("app.log", Some(missing.clone()));
        assert_eq!(resolved, missing);
    }
}
