//! Output formatting utilities
//!
//! This module provides the formatter that renders listings, confirmations,
//! and errors consistently across all commands.

mod formatter;

pub use formatter::Formatter;

/// Output configuration derived from CLI flags and configuration defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Render sizes in human-readable units
    pub human_readable: bool,
    /// Print full s3:// URIs in listings
    pub show_uri: bool,
}
