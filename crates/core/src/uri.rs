//! Storage URI parsing and composition
//!
//! Handles identifiers in the format: s3://bucket[/key]
//! Bucket-level commands also accept a bare bucket name without the scheme.

use crate::error::{Error, Result};

/// URI scheme prefix for remote storage locations
pub const SCHEME: &str = "s3://";

/// A parsed storage URI pointing to a bucket or an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageUri {
    /// A bucket root
    Bucket(String),
    /// An object within a bucket
    Object { bucket: String, key: String },
}

impl StorageUri {
    /// Parse a scheme-prefixed URI string
    ///
    /// The remainder after the scheme is split on the first `/` into bucket
    /// and key; an empty key yields the `Bucket` variant.
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix(SCHEME)
            .ok_or_else(|| Error::InvalidUri(input.to_string()))?;

        match rest.split_once('/') {
            Some((bucket, key)) if key.is_empty() => Self::bucket(bucket),
            Some((bucket, key)) => Self::object(bucket, key),
            None => Self::bucket(rest),
        }
        .map_err(|_| Error::InvalidUri(input.to_string()))
    }

    /// Compose a bucket-level URI
    pub fn bucket(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_bucket_name(&name)?;
        Ok(StorageUri::Bucket(name))
    }

    /// Compose an object URI from a (bucket, key) pair
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();
        validate_bucket_name(&bucket)?;
        if key.is_empty() {
            return Err(Error::InvalidUri(format!("{SCHEME}{bucket}/")));
        }
        Ok(StorageUri::Object { bucket, key })
    }

    /// Bucket name, for either variant
    pub fn bucket_name(&self) -> &str {
        match self {
            StorageUri::Bucket(name) => name,
            StorageUri::Object { bucket, .. } => bucket,
        }
    }

    /// Object key, if this URI names an object
    pub fn key(&self) -> Option<&str> {
        match self {
            StorageUri::Bucket(_) => None,
            StorageUri::Object { key, .. } => Some(key),
        }
    }
}

impl std::fmt::Display for StorageUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageUri::Bucket(name) => write!(f, "{SCHEME}{name}"),
            StorageUri::Object { bucket, key } => write!(f, "{SCHEME}{bucket}/{key}"),
        }
    }
}

/// A command-line target: either a full storage URI or a bare bucket name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Scheme-prefixed URI
    Uri(StorageUri),
    /// Plain bucket name, no scheme
    Name(String),
}

impl Target {
    /// Parse a command-line target string
    ///
    /// Inputs without the scheme prefix are kept verbatim as a bare bucket
    /// name; validity is checked by the accessor the command uses.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::Parameter("target cannot be empty".into()));
        }
        if input.starts_with(SCHEME) {
            Ok(Target::Uri(StorageUri::parse(input)?))
        } else {
            Ok(Target::Name(input.to_string()))
        }
    }

    /// Bucket name for bucket-level commands (mb, rb, ls)
    ///
    /// A target that names an object is rejected rather than silently
    /// stripped to its bucket.
    pub fn bucket_name(&self) -> Result<&str> {
        match self {
            Target::Name(name) => {
                validate_bucket_name(name)?;
                Ok(name)
            }
            Target::Uri(StorageUri::Bucket(name)) => Ok(name),
            Target::Uri(uri @ StorageUri::Object { .. }) => Err(Error::Parameter(format!(
                "'{uri}' names an object; expected a bucket"
            ))),
        }
    }

    /// (bucket, key) for object-level commands (get, del)
    pub fn object(&self) -> Result<(&str, &str)> {
        match self {
            Target::Uri(StorageUri::Object { bucket, key }) => Ok((bucket, key)),
            other => Err(Error::Parameter(format!(
                "Expecting a full S3 object URI ({SCHEME}bucket/key) instead of '{other}'"
            ))),
        }
    }

    /// The URI for commands that accept either variant (put)
    pub fn uri(&self) -> Result<&StorageUri> {
        match self {
            Target::Uri(uri) => Ok(uri),
            Target::Name(name) => Err(Error::Parameter(format!(
                "Expecting an S3 URI instead of '{name}'"
            ))),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Uri(uri) => uri.fmt(f),
            Target::Name(name) => f.write_str(name),
        }
    }
}

/// Bucket names must be non-empty and must not contain the path separator
/// or the scheme separator.
fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Parameter("bucket name cannot be empty".into()));
    }
    if name.contains('/') || name.contains("://") {
        return Err(Error::Parameter(format!("invalid bucket name '{name}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_uri() {
        let uri = StorageUri::parse("s3://backups/logs/app.log").unwrap();
        assert_eq!(
            uri,
            StorageUri::Object {
                bucket: "backups".into(),
                key: "logs/app.log".into()
            }
        );
        assert_eq!(uri.bucket_name(), "backups");
        assert_eq!(uri.key(), Some("logs/app.log"));
    }

    #[test]
    fn test_parse_bucket_uri() {
        let uri = StorageUri::parse("s3://backups").unwrap();
        assert_eq!(uri, StorageUri::Bucket("backups".into()));
        assert_eq!(uri.key(), None);

        // A trailing slash still names the bucket root
        let uri = StorageUri::parse("s3://backups/").unwrap();
        assert_eq!(uri, StorageUri::Bucket("backups".into()));
    }

    #[test]
    fn test_parse_empty_bucket() {
        assert!(StorageUri::parse("s3://").is_err());
        assert!(StorageUri::parse("s3:///orphan.txt").is_err());
    }

    #[test]
    fn test_parse_missing_scheme() {
        assert!(StorageUri::parse("backups/logs/app.log").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for input in ["s3://backups", "s3://backups/a.txt", "s3://b/dir/sub/c.bin"] {
            let uri = StorageUri::parse(input).unwrap();
            assert_eq!(uri.to_string(), input);
            assert_eq!(StorageUri::parse(&uri.to_string()).unwrap(), uri);
        }
    }

    #[test]
    fn test_compose_object() {
        let uri = StorageUri::object("backups", "logs/app.log").unwrap();
        assert_eq!(uri.to_string(), "s3://backups/logs/app.log");
    }

    #[test]
    fn test_compose_rejects_empty_key() {
        assert!(StorageUri::object("backups", "").is_err());
    }

    #[test]
    fn test_compose_rejects_bad_bucket() {
        assert!(StorageUri::bucket("").is_err());
        assert!(StorageUri::bucket("a/b").is_err());
    }

    #[test]
    fn test_target_bare_name() {
        let target = Target::parse("backups").unwrap();
        assert_eq!(target, Target::Name("backups".into()));
        assert_eq!(target.bucket_name().unwrap(), "backups");
    }

    #[test]
    fn test_target_bucket_name_rejects_object() {
        let target = Target::parse("s3://backups/file.txt").unwrap();
        assert!(target.bucket_name().is_err());
    }

    #[test]
    fn test_target_object_accessor() {
        let target = Target::parse("s3://backups/file.txt").unwrap();
        assert_eq!(target.object().unwrap(), ("backups", "file.txt"));

        // Bucket-only and bare targets are not objects
        assert!(Target::parse("s3://backups").unwrap().object().is_err());
        assert!(Target::parse("backups").unwrap().object().is_err());
    }

    #[test]
    fn test_target_uri_accessor() {
        let target = Target::parse("s3://backups").unwrap();
        assert_eq!(
            target.uri().unwrap(),
            &StorageUri::Bucket("backups".into())
        );

        let target = Target::parse("backups").unwrap();
        assert!(target.uri().is_err());
    }

    #[test]
    fn test_target_bare_name_with_slash() {
        let target = Target::parse("weird/name").unwrap();
        assert!(target.bucket_name().is_err());
    }
}
