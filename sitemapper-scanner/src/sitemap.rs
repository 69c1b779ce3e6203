//! Sitemap XML parsing.
//!
//! Leaf sitemaps (`<urlset>` of `<url>` entries) and sitemap indexes
//! (`<sitemapindex>` of `<sitemap>` entries) share one wire shape: a root
//! element whose children carry a `<loc>`. The root name is not checked, so a
//! single pass collects both lists and the caller decides which one applies.

use crate::error::{Result, ScanError};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Prefix of the synthetic entry emitted before each child of a sitemap index.
pub const INDEX_MARKER_PREFIX: &str = "Sitemap index: ";

/// Marker line for a child sitemap address.
pub fn index_marker(loc: &str) -> String {
    format!("{}{}", INDEX_MARKER_PREFIX, loc)
}

/// One fetched sitemap, after deciding which shape it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Page URLs, in document order.
    Leaf(Vec<String>),
    /// Child sitemap addresses, in document order.
    Index(Vec<String>),
}

/// Both `loc` lists found in a document, before the shape is decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSitemap {
    pub urls: Vec<String>,
    pub sitemaps: Vec<String>,
}

impl RawSitemap {
    /// A document with any `<url>` entry is a leaf; its `<sitemap>` entries are dropped.
    pub fn into_document(self) -> SitemapDocument {
        if !self.urls.is_empty() {
            SitemapDocument::Leaf(self.urls)
        } else {
            SitemapDocument::Index(self.sitemaps)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Url,
    Sitemap,
}

impl EntryKind {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"url" => Some(EntryKind::Url),
            b"sitemap" => Some(EntryKind::Sitemap),
            _ => None,
        }
    }
}

impl RawSitemap {
    fn push(&mut self, kind: EntryKind, loc: String) {
        match kind {
            EntryKind::Url => self.urls.push(loc),
            EntryKind::Sitemap => self.sitemaps.push(loc),
        }
    }
}

/// Parse a sitemap payload and classify it.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument> {
    parse_raw_sitemap(xml).map(RawSitemap::into_document)
}

/// Parse a sitemap payload into both of its `loc` lists.
///
/// Only direct children of the root are considered, and only the direct `loc`
/// child of each. Content after the root element closes is ignored.
pub fn parse_raw_sitemap(xml: &str) -> Result<RawSitemap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut raw = RawSitemap::default();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut entry: Option<EntryKind> = None;
    let mut loc: Option<String> = None;
    let mut in_loc = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ScanError::ParseFailed(format!(
                "XML parse error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                match depth {
                    0 => seen_root = true,
                    1 => {
                        entry = EntryKind::from_local_name(e.local_name().as_ref());
                        loc = None;
                    }
                    2 if entry.is_some() && e.local_name().as_ref() == b"loc" => {
                        in_loc = true;
                        loc = Some(String::new());
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                // <urlset/>
                0 => {
                    seen_root = true;
                    break;
                }
                1 => {
                    if let Some(kind) = EntryKind::from_local_name(e.local_name().as_ref()) {
                        raw.push(kind, String::new());
                    }
                }
                2 if entry.is_some() && e.local_name().as_ref() == b"loc" => {
                    loc = Some(String::new());
                }
                _ => {}
            },
            Event::Text(e) => {
                if in_loc && depth == 3 {
                    let text = e
                        .unescape()
                        .map_err(|e| ScanError::ParseFailed(format!("Invalid text in <loc>: {}", e)))?;
                    if let Some(current) = loc.as_mut() {
                        current.push_str(&text);
                    }
                }
            }
            Event::CData(e) => {
                if in_loc && depth == 3
                    && let Some(current) = loc.as_mut()
                {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ScanError::ParseFailed("Unexpected closing tag".to_string())
                })?;
                match depth {
                    0 => break,
                    1 => {
                        if let Some(kind) = entry.take() {
                            let value = loc.take().unwrap_or_default();
                            raw.push(kind, value.trim().to_string());
                        }
                    }
                    2 => in_loc = false,
                    _ => {}
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(ScanError::ParseFailed(
                        "Unexpected end of document".to_string(),
                    ));
                }
                break;
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err(ScanError::ParseFailed(
            "Document has no root element".to_string(),
        ));
    }

    Ok(raw)
}
