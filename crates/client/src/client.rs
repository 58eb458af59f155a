//! S3 client implementation
//!
//! Assembles signed requests, executes them over the shared transport, and
//! decodes responses. Implements the StorageOps trait from s3ctl-core.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::info;

use s3ctl_core::{
    Credentials, Error, Listing, Result, SCHEME, Settings, StorageOps, StorageUri, TransferResult,
};

use crate::decode::{self, ListKind};
use crate::sign::Signer;
use crate::translate::translate;
use crate::transport::{
    CountingStream, RequestDescriptor, ServiceResponse, Transport, bucket_path, http_date,
    object_path,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Client for one endpoint with one set of credentials.
pub struct S3Client {
    transport: Transport,
    signer: Signer,
    settings: Settings,
}

impl S3Client {
    /// Create a client from credentials and resolved settings.
    pub fn new(credentials: Credentials, settings: &Settings) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(settings)?,
            signer: Signer::new(credentials),
            settings: settings.clone(),
        })
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeouts.request_secs)
    }

    /// Sign with the current time and execute.
    async fn send(&self, mut request: RequestDescriptor) -> Result<ServiceResponse> {
        self.signer.authorize(&mut request, &http_date(Utc::now()))?;
        self.transport.execute(request).await
    }

    /// Turn a non-success response into a typed error.
    ///
    /// `resource` is the bucket name or object URI the request addressed,
    /// carried into the translated error message.
    async fn remote_failure(&self, response: ServiceResponse, resource: &str) -> Error {
        let status = response.status();
        match response.bytes().await {
            Ok(body) => translate(decode::decode_error(status, &body), resource),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl StorageOps for S3Client {
    async fn list_all_buckets(&self) -> Result<Listing> {
        let request =
            RequestDescriptor::new(Method::GET, "/").with_timeout(self.request_timeout());
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(self.remote_failure(response, "/").await);
        }
        decode::decode_listing(response.bytes().await?, ListKind::Buckets)
    }

    async fn list_bucket(&self, bucket: &str, marker: Option<&str>) -> Result<Listing> {
        let mut request = RequestDescriptor::new(Method::GET, bucket_path(bucket))
            .with_timeout(self.request_timeout());
        if let Some(marker) = marker {
            request = request.with_query("marker", marker);
        }
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(self.remote_failure(response, bucket).await);
        }
        decode::decode_listing(response.bytes().await?, ListKind::Objects)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let request = RequestDescriptor::new(Method::PUT, bucket_path(bucket))
            .with_timeout(self.request_timeout());
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(self.remote_failure(response, bucket).await);
        }
        info!(bucket, "bucket created");
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let request = RequestDescriptor::new(Method::DELETE, bucket_path(bucket))
            .with_timeout(self.request_timeout());
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(self.remote_failure(response, bucket).await);
        }
        info!(bucket, "bucket removed");
        Ok(())
    }

    async fn put_object(&self, source: &Path, bucket: &str, key: &str) -> Result<TransferResult> {
        let file = File::open(source).await?;
        let length = file.metadata().await?.len();
        let content_type = mime_guess::from_path(source)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let uri = format!("{SCHEME}{bucket}/{key}");

        let (stream, sent) = CountingStream::new(ReaderStream::new(file));
        let mut request = RequestDescriptor::new(Method::PUT, object_path(bucket, key))
            .with_body(reqwest::Body::wrap_stream(stream), length);
        request.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&content_type)
                .map_err(|e| Error::Parameter(format!("invalid content type: {e}")))?,
        );

        // Uploads stream without a request deadline; only the connect
        // timeout applies.
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(Error::Transport(msg)) => {
                let sent = sent.load(Ordering::Relaxed);
                return Err(Error::Transport(if sent > 0 {
                    format!("upload interrupted after {sent} bytes: {msg}")
                } else {
                    msg
                }));
            }
            Err(e) => return Err(e),
        };
        if !response.status().is_success() {
            return Err(self.remote_failure(response, &uri).await);
        }
        info!(source = %source.display(), %uri, bytes = length, "object stored");
        Ok(TransferResult {
            size: length,
            target: uri,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<TransferResult> {
        let uri = format!("{SCHEME}{bucket}/{key}");

        // Refuse to clobber an existing file before any request goes out.
        if dest.exists() && !self.settings.force {
            return Err(Error::Parameter(format!(
                "File '{}' already exists. Use --force to overwrite it",
                dest.display()
            )));
        }

        let request = RequestDescriptor::new(Method::GET, object_path(bucket, key));
        let mut response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(self.remote_failure(response, &uri).await);
        }

        let mut file = File::create(dest).await?;
        let mut written: u64 = 0;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    file.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                }
                Ok(None) => break,
                Err(Error::Transport(msg)) => {
                    return Err(Error::Transport(format!(
                        "download interrupted after {written} bytes: {msg}"
                    )));
                }
                Err(e) => return Err(e),
            }
        }
        file.flush().await?;
        info!(%uri, dest = %dest.display(), bytes = written, "object saved");
        Ok(TransferResult {
            size: written,
            target: dest.display().to_string(),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let uri = format!("{SCHEME}{bucket}/{key}");
        let request = RequestDescriptor::new(Method::DELETE, object_path(bucket, key))
            .with_timeout(self.request_timeout());
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(self.remote_failure(response, &uri).await);
        }
        info!(%uri, "object deleted");
        Ok(())
    }
}

/// Pair local sources with object keys before any request is made.
///
/// A single source uses the target key verbatim when one is present,
/// otherwise its own file name. Several sources each contribute their file
/// name, prefixed by the target key when one is given; that reading is only
/// taken under `force` since a non-empty key more likely names one object.
pub fn resolve_put_targets(
    sources: &[PathBuf],
    target: &StorageUri,
    force: bool,
) -> Result<Vec<(PathBuf, String)>> {
    let key = target.key().unwrap_or("");

    if sources.len() > 1 && !key.is_empty() && !force {
        return Err(Error::Parameter(format!(
            "Uploading multiple files to '{target}' would use its key as a prefix. \
             Use --force to confirm, or target the bucket itself"
        )));
    }

    if let [source] = sources {
        if !key.is_empty() {
            return Ok(vec![(source.clone(), key.to_string())]);
        }
    }

    let mut targets = Vec::with_capacity(sources.len());
    for source in sources {
        let name = source.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            Error::Parameter(format!(
                "Cannot derive an object key from '{}'",
                source.display()
            ))
        })?;
        targets.push((source.clone(), format!("{key}{name}")));
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3ctl_core::Timeouts;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_resolve_multiple_files_use_basenames() {
        let target = StorageUri::bucket("backups").unwrap();
        let resolved =
            resolve_put_targets(&paths(&["a/x.txt", "b/y.bin", "z.dat"]), &target, false).unwrap();
        let keys: Vec<&str> = resolved.iter().map(|(_, k)| k.as_str()).collect();
        assert_eq!(keys, ["x.txt", "y.bin", "z.dat"]);
    }

    #[test]
    fn test_resolve_single_file_key_verbatim() {
        let target = StorageUri::object("backups", "logs/renamed.log").unwrap();
        let resolved = resolve_put_targets(&paths(&["app.log"]), &target, false).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].1, "logs/renamed.log");
    }

    #[test]
    fn test_resolve_single_file_empty_key_uses_basename() {
        let target = StorageUri::bucket("backups").unwrap();
        let resolved = resolve_put_targets(&paths(&["logs/app.log"]), &target, false).unwrap();
        assert_eq!(resolved[0].1, "app.log");
    }

    #[test]
    fn test_resolve_multiple_files_with_key_requires_force() {
        let target = StorageUri::object("backups", "logs/").unwrap();
        let sources = paths(&["a.log", "b.log"]);

        let err = resolve_put_targets(&sources, &target, false).unwrap_err();
        assert!(matches!(err, Error::Parameter(_)));

        let resolved = resolve_put_targets(&sources, &target, true).unwrap();
        let keys: Vec<&str> = resolved.iter().map(|(_, k)| k.as_str()).collect();
        assert_eq!(keys, ["logs/a.log", "logs/b.log"]);
    }

    #[test]
    fn test_resolve_rejects_sources_without_file_name() {
        let target = StorageUri::bucket("backups").unwrap();
        let err = resolve_put_targets(&paths(&[".."]), &target, false).unwrap_err();
        assert!(matches!(err, Error::Parameter(_)));
    }

    fn offline_client(force: bool) -> S3Client {
        let settings = Settings {
            // Reserved port on localhost; nothing listens there.
            host: "http://127.0.0.1:1".to_string(),
            human_readable: false,
            show_uri: false,
            force,
            verbosity: "warn".to_string(),
            timeouts: Timeouts::default(),
        };
        let credentials = Credentials::new("key", "secret");
        S3Client::new(credentials, &settings).unwrap()
    }

    #[tokio::test]
    async fn test_get_refuses_existing_dest_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("have.txt");
        std::fs::write(&dest, b"local data").unwrap();

        let client = offline_client(false);
        let err = client
            .get_object("backups", "have.txt", &dest)
            .await
            .unwrap_err();
        // A Parameter error, not Transport: the endpoint was never contacted.
        assert!(matches!(err, Error::Parameter(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"local data");
    }

    #[tokio::test]
    async fn test_get_with_force_reaches_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("have.txt");
        std::fs::write(&dest, b"local data").unwrap();

        let client = offline_client(true);
        let err = client
            .get_object("backups", "have.txt", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
