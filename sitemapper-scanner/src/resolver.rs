use crate::client::build_client;
use crate::error::Result;
use crate::sitemap::{SitemapDocument, index_marker, parse_sitemap};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info};

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;

/// Flattens a sitemap, following sitemap indexes to any depth.
///
/// Children of an index are resolved one after another in document order. The
/// first failing child aborts the whole resolution with its error.
pub struct Resolver {
    client: Client,
}

impl Resolver {
    /// Sitemap fetches carry no timeout of their own.
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(build_client(None)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn resolve(&self, address: &str) -> Result<Vec<String>> {
        info!("Resolving sitemap {}", address);
        let urls = self.resolve_recursive(address.to_string()).await?;
        info!("Resolved {} entries from {}", urls.len(), address);
        Ok(urls)
    }

    fn resolve_recursive(&self, address: String) -> ResolveFuture<'_> {
        Box::pin(async move {
            match self.fetch_document(&address).await? {
                SitemapDocument::Leaf(urls) => {
                    debug!("{} is a leaf sitemap with {} URLs", address, urls.len());
                    Ok(urls)
                }
                SitemapDocument::Index(children) => {
                    debug!("{} is a sitemap index with {} children", address, children.len());
                    let mut urls = Vec::new();
                    for child in children {
                        let child_urls = self.resolve_recursive(child.clone()).await?;
                        urls.push(index_marker(&child));
                        urls.extend(child_urls);
                    }
                    Ok(urls)
                }
            }
        })
    }

    /// The response status is not inspected; the body alone decides.
    async fn fetch_document(&self, address: &str) -> Result<SitemapDocument> {
        debug!("Fetching {}", address);
        let response = self.client.get(address).send().await?;
        let body = response.text().await?;
        parse_sitemap(&body)
    }
}
