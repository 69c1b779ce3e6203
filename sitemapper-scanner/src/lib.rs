pub mod client;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod robots;
pub mod sitemap;

pub use client::build_client;
pub use error::ScanError;
pub use locator::{DEFAULT_CANDIDATE_PATHS, DEFAULT_PROBE_TIMEOUT, Locator};
pub use resolver::Resolver;
pub use sitemap::{INDEX_MARKER_PREFIX, SitemapDocument, parse_sitemap};
