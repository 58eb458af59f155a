//! Output formatter for listings and confirmations
//!
//! Ensures consistent output formatting across all commands: listing
//! columns, size rendering, and error reporting.

use chrono::{DateTime, Utc};
use s3ctl_core::{ListingEntry, SCHEME};

use super::OutputConfig;

/// Blank stand-in for the timestamp column when none is known
const TIMESTAMP_BLANK: &str = "                ";

/// Formatter for CLI output
///
/// Listing lines go to stdout, errors to stderr. Size and URI rendering
/// follow the resolved configuration.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render a byte count per the human-readable setting
    pub fn size(&self, bytes: u64) -> String {
        if self.config.human_readable {
            humansize::format_size(bytes, humansize::BINARY)
        } else {
            bytes.to_string()
        }
    }

    /// Listing timestamp column; unknown timestamps render blank
    pub fn timestamp(&self, when: Option<DateTime<Utc>>) -> String {
        when.map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| TIMESTAMP_BLANK.to_string())
    }

    /// One bucket listing line: timestamp and bucket name or full URI
    pub fn bucket_line(&self, entry: &ListingEntry) -> String {
        let label = if self.config.show_uri {
            format!("{SCHEME}{}", entry.key)
        } else {
            entry.key.clone()
        };
        format!("{}  {label}", self.timestamp(entry.last_modified))
    }

    /// One object listing line: timestamp, size, and key or full URI
    pub fn object_line(&self, bucket: &str, entry: &ListingEntry) -> String {
        let label = if self.config.show_uri {
            format!("{SCHEME}{bucket}/{}", entry.key)
        } else {
            entry.key.clone()
        };
        format!(
            "{}  {:>10}  {label}",
            self.timestamp(entry.last_modified),
            self.size(entry.size.unwrap_or(0)),
        )
    }

    /// Print a command confirmation
    pub fn success(&self, message: &str) {
        println!("{message}");
    }

    /// Print an error message
    ///
    /// Errors always go to stderr so listings stay pipeable.
    pub fn error(&self, message: &str) {
        eprintln!("ERROR: {message}");
    }

    /// Print a line of output
    pub fn println(&self, message: &str) {
        println!("{message}");
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(key: &str, size: u64) -> ListingEntry {
        ListingEntry::object(
            key,
            size,
            Some(Utc.with_ymd_and_hms(2007, 1, 19, 1, 2, 0).unwrap()),
            None,
        )
    }

    #[test]
    fn test_size_plain_and_human() {
        let plain = Formatter::default();
        assert_eq!(plain.size(1024), "1024");

        let human = Formatter::new(OutputConfig {
            human_readable: true,
            show_uri: false,
        });
        assert_eq!(human.size(1024), "1 KiB");
        assert_eq!(human.size(0), "0 B");
    }

    #[test]
    fn test_timestamp_blank_when_unknown() {
        let formatter = Formatter::default();
        assert_eq!(formatter.timestamp(None), TIMESTAMP_BLANK);
        let formatted =
            formatter.timestamp(Some(Utc.with_ymd_and_hms(2007, 1, 19, 1, 2, 0).unwrap()));
        assert_eq!(formatted, "2007-01-19 01:02");
        assert_eq!(formatted.len(), TIMESTAMP_BLANK.len());
    }

    #[test]
    fn test_object_line_key_or_uri() {
        let plain = Formatter::default();
        let line = plain.object_line("backups", &entry("logs/app.log", 512));
        assert!(line.ends_with("  logs/app.log"));
        assert!(line.contains("512"));
        assert!(!line.contains("s3://"));

        let with_uris = Formatter::new(OutputConfig {
            human_readable: false,
            show_uri: true,
        });
        let line = with_uris.object_line("backups", &entry("logs/app.log", 512));
        assert!(line.ends_with("  s3://backups/logs/app.log"));
    }

    #[test]
    fn test_bucket_line_name_or_uri() {
        let entry = ListingEntry::bucket(
            "backups",
            Some(Utc.with_ymd_and_hms(2007, 1, 19, 1, 2, 0).unwrap()),
        );

        let plain = Formatter::default();
        assert_eq!(plain.bucket_line(&entry), "2007-01-19 01:02  backups");

        let with_uris = Formatter::new(OutputConfig {
            human_readable: false,
            show_uri: true,
        });
        assert_eq!(
            with_uris.bucket_line(&entry),
            "2007-01-19 01:02  s3://backups"
        );
    }
}
