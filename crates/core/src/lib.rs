//! s3ctl-core: Core library for the s3ctl S3 client
//!
//! This crate provides the shared foundation for s3ctl, including:
//! - Configuration management (credentials, endpoint, defaults)
//! - Storage URI parsing and composition
//! - The StorageOps trait and its result types
//! - The unified error taxonomy with exit-code mapping
//!
//! This crate contains no wire-level code; the client engine and the CLI
//! both build on it, which keeps the command tier testable against the
//! trait alone.

pub mod config;
pub mod error;
pub mod traits;
pub mod uri;

pub use config::{Config, ConfigManager, Credentials, Settings, Timeouts};
pub use error::{Error, Result};
pub use traits::{EntryIter, Listing, ListingEntry, StorageOps, TransferResult};
pub use uri::{SCHEME, StorageUri, Target};
