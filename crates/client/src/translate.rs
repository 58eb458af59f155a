//! Service error translation.
//!
//! Maps the closed set of well-known service error codes onto typed
//! [`Error`] variants so callers can match on them. Codes outside the
//! table pass through as [`Error::Remote`] with the raw status, code,
//! and message intact.

use s3ctl_core::Error;

use crate::decode::RemoteError;

/// Translate a decoded error document into a typed error.
///
/// `resource` is the bucket name or object URI the failed request was
/// addressed to; the translated variants carry it so messages name the
/// thing that failed rather than the service's resource path.
pub fn translate(err: RemoteError, resource: &str) -> Error {
    match err.code.as_str() {
        "NoSuchBucket" => Error::BucketNotFound(resource.to_string()),
        "NoSuchKey" => Error::KeyNotFound(resource.to_string()),
        "BucketAlreadyExists" | "BucketAlreadyOwnedByYou" => {
            Error::BucketExists(resource.to_string())
        }
        "BucketNotEmpty" => Error::BucketNotEmpty(resource.to_string()),
        "AccessDenied" => Error::AccessDenied(resource.to_string()),
        _ => Error::Remote {
            status: err.status,
            code: err.code,
            message: err.message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(code: &str) -> RemoteError {
        RemoteError {
            status: 400,
            code: code.to_string(),
            message: format!("{code} happened"),
            resource: None,
        }
    }

    #[test]
    fn test_translate_known_codes() {
        assert!(matches!(
            translate(remote("NoSuchBucket"), "backups"),
            Error::BucketNotFound(name) if name == "backups"
        ));
        assert!(matches!(
            translate(remote("NoSuchKey"), "s3://backups/logs/app.log"),
            Error::KeyNotFound(name) if name == "s3://backups/logs/app.log"
        ));
        assert!(matches!(
            translate(remote("BucketNotEmpty"), "backups"),
            Error::BucketNotEmpty(name) if name == "backups"
        ));
        assert!(matches!(
            translate(remote("AccessDenied"), "backups"),
            Error::AccessDenied(name) if name == "backups"
        ));
    }

    #[test]
    fn test_translate_both_exists_codes() {
        for code in ["BucketAlreadyExists", "BucketAlreadyOwnedByYou"] {
            assert!(matches!(
                translate(remote(code), "backups"),
                Error::BucketExists(name) if name == "backups"
            ));
        }
    }

    #[test]
    fn test_translate_message_names_the_bucket() {
        let err = translate(remote("BucketAlreadyExists"), "backups");
        assert!(err.to_string().contains("backups"));
    }

    #[test]
    fn test_unknown_code_passes_through_unchanged() {
        let err = RemoteError {
            status: 501,
            code: "SlowDown".to_string(),
            message: "Reduce your request rate".to_string(),
            resource: Some("/backups".to_string()),
        };
        match translate(err, "backups") {
            Error::Remote { status, code, message } => {
                assert_eq!(status, 501);
                assert_eq!(code, "SlowDown");
                assert_eq!(message, "Reduce your request rate");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }
}
