//! s3ctl-client: wire-level S3 client for s3ctl
//!
//! Implements the StorageOps trait from s3ctl-core directly against the
//! S3 REST protocol: SigV2 request signing, HTTP transport, lazy XML
//! response decoding, and service error translation. It is the only crate
//! that talks to the network.

pub mod client;
pub mod decode;
pub mod sign;
pub mod translate;
pub mod transport;

pub use client::{S3Client, resolve_put_targets};
