//! XML response decoding.
//!
//! Listings (`ListAllMyBucketsResult`, `ListBucketResult`) decode into a lazy
//! [`Listing`]: the envelope fields preceding the first entry are read
//! eagerly, the entries themselves on demand, in the order the service
//! returned them. Error documents decode into [`RemoteError`] for the
//! translator; bodies that are not valid error XML synthesize a generic
//! unparseable-response error carrying the raw status.

use std::io::Cursor;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::StatusCode;

use s3ctl_core::{Error, Listing, ListingEntry, Result};

/// Which listing document shape to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `ListAllMyBucketsResult`: entries under `Buckets/Bucket`
    Buckets,
    /// `ListBucketResult`: entries under `Contents`
    Objects,
}

impl ListKind {
    fn entry_tag(self) -> &'static [u8] {
        match self {
            ListKind::Buckets => b"Bucket",
            ListKind::Objects => b"Contents",
        }
    }
}

/// A service error document, consumed exactly once by the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// Raw HTTP status
    pub status: u16,
    /// Service error code, e.g. `NoSuchBucket`
    pub code: String,
    /// Human-readable message from the service
    pub message: String,
    /// Resource path the error refers to, when provided
    pub resource: Option<String>,
}

type BodyReader = Reader<Cursor<Bytes>>;

/// Decode a listing body.
///
/// Reads the envelope (`IsTruncated`, `NextMarker`) up to the first entry;
/// the returned [`Listing`] yields entries lazily and can only be restarted
/// by re-issuing the request.
pub fn decode_listing(body: Bytes, kind: ListKind) -> Result<Listing> {
    let mut reader = Reader::from_reader(Cursor::new(body));
    reader.config_mut().trim_text(true);

    let mut decoder = ListingDecoder {
        reader,
        buf: Vec::new(),
        scratch: Vec::new(),
        kind,
        pending: false,
        done: false,
    };

    let mut truncated = false;
    let mut next_marker = None;

    // Skip the declaration and consume the root element.
    loop {
        decoder.buf.clear();
        match decoder.reader.read_event_into(&mut decoder.buf).map_err(xml_err)? {
            Event::Start(_) => break,
            Event::Eof => return Err(Error::Decode("missing listing root element".into())),
            _ => {}
        }
    }

    // Envelope scan: everything up to the first entry.
    loop {
        decoder.buf.clear();
        match decoder.reader.read_event_into(&mut decoder.buf).map_err(xml_err)? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name == kind.entry_tag() {
                    decoder.pending = true;
                    break;
                }
                match name.as_slice() {
                    // Bucket entries are nested one level down.
                    b"Buckets" if kind == ListKind::Buckets => {}
                    b"IsTruncated" => {
                        truncated = read_text(&mut decoder.reader, &mut decoder.scratch)? == "true";
                    }
                    b"NextMarker" => {
                        let text = read_text(&mut decoder.reader, &mut decoder.scratch)?;
                        if !text.is_empty() {
                            next_marker = Some(text);
                        }
                    }
                    _ => skip_element(&mut decoder.reader, &mut decoder.scratch)?,
                }
            }
            Event::End(_) => {}
            Event::Eof => {
                decoder.done = true;
                break;
            }
            _ => {}
        }
    }

    Ok(Listing {
        entries: Box::new(decoder),
        truncated,
        next_marker,
    })
}

/// Lazy entry producer over the fetched body.
struct ListingDecoder {
    reader: BodyReader,
    buf: Vec<u8>,
    scratch: Vec<u8>,
    kind: ListKind,
    /// The envelope scan already consumed this entry's opening tag
    pending: bool,
    done: bool,
}

impl Iterator for ListingDecoder {
    type Item = Result<ListingEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.pending {
            self.pending = false;
            return self.yield_entry();
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    if e.name().as_ref() == self.kind.entry_tag() {
                        return self.yield_entry();
                    }
                    if let Err(err) = skip_element(&mut self.reader, &mut self.scratch) {
                        self.done = true;
                        return Some(Err(err));
                    }
                }
                Ok(Event::Eof) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(xml_err(e)));
                }
            }
        }
    }
}

impl ListingDecoder {
    fn yield_entry(&mut self) -> Option<Result<ListingEntry>> {
        let item = self.decode_entry();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }

    /// Decode one entry; the reader sits just after its opening tag.
    fn decode_entry(&mut self) -> Result<ListingEntry> {
        let mut key = String::new();
        let mut size = None;
        let mut last_modified = None;
        let mut etag = None;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf).map_err(xml_err)? {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    match name.as_slice() {
                        b"Key" | b"Name" => {
                            key = read_text(&mut self.reader, &mut self.scratch)?;
                        }
                        b"Size" => {
                            let text = read_text(&mut self.reader, &mut self.scratch)?;
                            size = Some(text.parse::<u64>().map_err(|_| {
                                Error::Decode(format!("invalid Size value '{text}'"))
                            })?);
                        }
                        b"LastModified" | b"CreationDate" => {
                            let text = read_text(&mut self.reader, &mut self.scratch)?;
                            // Unparseable timestamps degrade to None.
                            last_modified = parse_timestamp(&text);
                        }
                        b"ETag" => {
                            let text = read_text(&mut self.reader, &mut self.scratch)?;
                            etag = Some(text.trim_matches('"').to_string());
                        }
                        _ => skip_element(&mut self.reader, &mut self.scratch)?,
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    self.done = true;
                    return Err(Error::Decode("unexpected EOF inside listing entry".into()));
                }
                _ => {}
            }
        }

        Ok(match self.kind {
            ListKind::Buckets => ListingEntry::bucket(key, last_modified),
            ListKind::Objects => ListingEntry::object(key, size.unwrap_or(0), last_modified, etag),
        })
    }
}

/// Decode a service error document.
///
/// A body that does not parse as error XML synthesizes a generic
/// unparseable-response error carrying the raw status.
pub fn decode_error(status: StatusCode, body: &[u8]) -> RemoteError {
    match parse_error_document(body) {
        Some((code, message, resource)) => RemoteError {
            status: status.as_u16(),
            code,
            message,
            resource,
        },
        None => RemoteError {
            status: status.as_u16(),
            code: "UnparseableResponse".to_string(),
            message: format!("service returned HTTP {status} with an unreadable body"),
            resource: None,
        },
    }
}

fn parse_error_document(body: &[u8]) -> Option<(String, String, Option<String>)> {
    let mut reader = Reader::from_reader(Cursor::new(Bytes::copy_from_slice(body)));
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut scratch = Vec::new();

    let mut code = None;
    let mut message = String::new();
    let mut resource = None;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).ok()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"Error" => {}
                    b"Code" => code = Some(read_text(&mut reader, &mut scratch).ok()?),
                    b"Message" => message = read_text(&mut reader, &mut scratch).ok()?,
                    b"Resource" => {
                        let text = read_text(&mut reader, &mut scratch).ok()?;
                        if !text.is_empty() {
                            resource = Some(text);
                        }
                    }
                    _ => skip_element(&mut reader, &mut scratch).ok()?,
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    code.map(|code| (code, message, resource))
}

/// Read the text content of the current element and consume its end tag.
fn read_text(reader: &mut BodyReader, buf: &mut Vec<u8>) -> Result<String> {
    let mut text = String::new();
    loop {
        buf.clear();
        match reader.read_event_into(buf).map_err(xml_err)? {
            Event::Text(e) => {
                let decoded = e.decode().map_err(xml_err)?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|e| Error::Decode(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(Error::Decode("unexpected EOF while reading element text".into()));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut BodyReader, buf: &mut Vec<u8>) -> Result<()> {
    let mut depth = 0u32;
    loop {
        buf.clear();
        match reader.read_event_into(buf).map_err(xml_err)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(());
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(Error::Decode("unexpected EOF while skipping element".into()));
            }
            _ => {}
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .map(|naive| naive.and_utc())
                .ok()
        })
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::Decode(e.to_string())
}
