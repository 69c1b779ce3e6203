use crate::config::ExtractorConfig;
use serde::{Deserialize, Serialize};
use sitemapper_scanner::{Locator, Resolver, ScanError};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::info;
use url::Url;

/// What the caller handed us: a bare domain or a sitemap address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Domain,
    Sitemap,
}

impl RequestKind {
    /// Name of the JSON field carrying the request value.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Domain => "domain",
            RequestKind::Sitemap => "sitemap",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Missing '{0}' field in JSON payload")]
    MissingField(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidAddress(String),

    #[error("{0}")]
    Locate(#[source] ScanError),

    #[error("Failed to parse sitemap: {0}")]
    Resolve(#[source] ScanError),
}

/// Flattened result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub urls: Vec<String>,
}

/// Pull the value for `kind` out of a JSON object body such as
/// `{"domain": "example.com"}`. Every value in the object must be a string or
/// `null` (read as empty).
///
/// Only the first JSON value in the body is decoded and anything after it is
/// ignored. A `null` body carries no fields at all.
pub fn parse_request_payload(kind: RequestKind, body: &[u8]) -> Result<String, ExtractError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let payload: Option<HashMap<String, Option<String>>> =
        Deserialize::deserialize(&mut deserializer).map_err(ExtractError::InvalidPayload)?;

    payload
        .unwrap_or_default()
        .remove(kind.as_str())
        .map(Option::unwrap_or_default)
        .ok_or(ExtractError::MissingField(kind.as_str()))
}

/// A sitemap address has to be an absolute URL before anything is fetched.
pub fn validate_sitemap_address(address: &str) -> Result<Url, ExtractError> {
    Url::parse(address).map_err(|e| ExtractError::InvalidAddress(format!("{}: {}", address, e)))
}

/// Locates (for domains) and resolves sitemaps.
pub struct Extractor {
    locator: Locator,
    resolver: Resolver,
}

impl Extractor {
    pub fn new(locator: Locator, resolver: Resolver) -> Self {
        Self { locator, resolver }
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ScanError> {
        let locator = Locator::with_timeout(config.probe_timeout)?
            .with_candidates(config.candidates.iter().cloned())
            .with_probe_scheme(config.probe_scheme.clone())
            .with_probe_concurrency(config.probe_concurrency);
        let resolver = Resolver::new()?;
        Ok(Self::new(locator, resolver))
    }

    pub async fn extract(&self, kind: RequestKind, value: &str) -> Result<ExtractResponse, ExtractError> {
        info!("Extracting {} {}", kind, value);

        let address = match kind {
            RequestKind::Domain => self
                .locator
                .locate(value)
                .await
                .map_err(ExtractError::Locate)?,
            RequestKind::Sitemap => {
                validate_sitemap_address(value)?;
                value.to_string()
            }
        };

        let urls = self
            .resolver
            .resolve(&address)
            .await
            .map_err(ExtractError::Resolve)?;

        Ok(ExtractResponse { kind, urls })
    }

    pub async fn extract_domain(&self, domain: &str) -> Result<ExtractResponse, ExtractError> {
        self.extract(RequestKind::Domain, domain).await
    }

    pub async fn extract_sitemap(&self, address: &str) -> Result<ExtractResponse, ExtractError> {
        self.extract(RequestKind::Sitemap, address).await
    }
}
