use crate::client::build_client;
use crate::error::{Result, ScanError};
use crate::robots::sitemap_from_robots;
use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Timeout applied to the robots fetch and every candidate probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Conventional sitemap locations, in probe order.
///
/// Each path is listed once, and `/test.xml` is left out on purpose: a site that
/// answers every path with `200 OK` would otherwise report it as its sitemap.
pub const DEFAULT_CANDIDATE_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap1.xml",
    "/sitemap.txt",
    "/sitemap_index.xml",
    "/sitemap/",
    "/sitemap",
    "/sitemap-index.xml",
    "/sitemaps/",
    "/sitemaps",
    "/site-map",
    "/sitemap-indexes/",
    "/post-sitemap.xml",
    "/page-sitemap.xml",
    "/category-sitemap.xml",
    "/tag-sitemap.xml",
    "/pages-sitemap.xml",
    "/blog-pages-sitemap.xml",
    "/member-profile-sitemap.xml",
    "/dynamic-pages-sitemap.xml",
    "/other-pages-sitemap.xml",
    "/sitemap.xml.gz",
    "/sitemapindex.xml",
    "/sitemap_index.xml.gz",
    "/sitemap/index.xml",
    "/sitemap_map.html",
    "/wp-sitemap.xml",
    "/author-sitemap.xml",
    "/post-sitemap",
    "/sitemaps-2-sitemap.xml",
    "/page-sitemap",
];

/// Prefix `http://` unless the input already names an http(s) scheme, then
/// require a host.
pub fn normalize_domain(domain: &str) -> Result<Url> {
    if domain.is_empty() {
        return Err(ScanError::InvalidDomain(domain.to_string()));
    }

    let with_scheme = if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("http://{}", domain)
    };

    let url =
        Url::parse(&with_scheme).map_err(|_| ScanError::InvalidDomain(domain.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ScanError::InvalidDomain(domain.to_string())),
    }
}

/// Host plus any port written in `domain`, as used to build probe addresses.
pub fn probe_authority(domain: &str) -> Result<String> {
    let url = normalize_domain(domain)?;
    let host = url.host_str().unwrap_or_default();
    let port = url.port().map(|port| port.to_string()).or_else(|| explicit_port(domain));

    Ok(match port {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// `Url` drops a port equal to the scheme default, so `example.com:80` has to be
/// read back from the input text.
fn explicit_port(domain: &str) -> Option<String> {
    let rest = domain.split_once("://").map_or(domain, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let (_, port) = authority.rsplit_once(':')?;

    if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
        Some(port.to_string())
    } else {
        None
    }
}

/// Finds the sitemap address of a domain.
///
/// The robots file is consulted first; failing a `Sitemap:` directive there,
/// the candidate paths are probed in order and the first `200 OK` wins.
pub struct Locator {
    client: Client,
    candidates: Vec<String>,
    scheme: String,
    probe_concurrency: usize,
}

impl Locator {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(build_client(Some(timeout))?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            candidates: DEFAULT_CANDIDATE_PATHS.iter().map(|p| p.to_string()).collect(),
            scheme: "https".to_string(),
            probe_concurrency: 1,
        }
    }

    pub fn with_candidates<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_probe_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Number of candidate probes allowed in flight. Results are still taken in
    /// candidate order, so the winner never depends on which response lands first.
    pub fn with_probe_concurrency(mut self, concurrency: usize) -> Self {
        self.probe_concurrency = concurrency.max(1);
        self
    }

    pub async fn locate(&self, domain: &str) -> Result<String> {
        let authority = probe_authority(domain)?;
        info!("Locating sitemap for {}", authority);

        if let Some(declared) = self.declared_sitemap(&authority).await? {
            info!("robots.txt declares sitemap {}", declared);
            return Ok(declared);
        }

        if let Some(found) = self.probe_candidates(&authority).await? {
            info!("Found sitemap at {}", found);
            return Ok(found);
        }

        Err(ScanError::NotFound(authority))
    }

    async fn declared_sitemap(&self, authority: &str) -> Result<Option<String>> {
        let robots_url = format!("{}://{}/robots.txt", self.scheme, authority);
        debug!("Fetching {}", robots_url);

        let response = self.client.get(&robots_url).send().await?;
        if response.status() != StatusCode::OK {
            debug!("{} returned {}", robots_url, response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(sitemap_from_robots(&body))
    }

    async fn probe_candidates(&self, authority: &str) -> Result<Option<String>> {
        let urls: Vec<String> = self
            .candidates
            .iter()
            .map(|path| format!("{}://{}{}", self.scheme, authority, path))
            .collect();

        let client = &self.client;
        let mut probes = stream::iter(urls)
            .map(|url| probe(client, url))
            .buffered(self.probe_concurrency);

        while let Some(outcome) = probes.next().await {
            if let Some(url) = outcome? {
                return Ok(Some(url));
            }
        }

        Ok(None)
    }
}

/// `Ok(Some(url))` on `200 OK`, `Ok(None)` on any other status. Request errors
/// are returned as-is and stop the probe sequence.
async fn probe(client: &Client, url: String) -> Result<Option<String>> {
    let response = client.get(&url).send().await?;
    let status = response.status();
    debug!("Probed {} ({})", url, status.as_u16());

    if status == StatusCode::OK {
        Ok(Some(url))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn test_locator() -> Locator {
        Locator::with_timeout(Duration::from_secs(3))
            .unwrap()
            .with_probe_scheme("http")
    }

    async fn requested_paths(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.url.path().to_string())
            .collect()
    }

    #[test]
    fn test_normalize_domain_adds_scheme() {
        let url = normalize_domain("example.com").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_normalize_domain_keeps_scheme() {
        let url = normalize_domain("https://example.com/some/page").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(probe_authority("https://example.com/some/page").unwrap(), "example.com");
    }

    #[test]
    fn test_probe_authority_keeps_port() {
        assert_eq!(probe_authority("localhost:8080").unwrap(), "localhost:8080");
    }

    #[test]
    fn test_probe_authority_keeps_default_port() {
        assert_eq!(probe_authority("example.com:80").unwrap(), "example.com:80");
        assert_eq!(
            probe_authority("https://example.com:443/sitemap.xml").unwrap(),
            "example.com:443"
        );
        assert_eq!(probe_authority("http://[::1]/").unwrap(), "[::1]");
        assert_eq!(probe_authority("http://user:pw@example.com/").unwrap(), "example.com");
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_locate_future_is_send() {
        let locator = test_locator();
        let future = locator.locate("example.com");
        assert_send(&future);
    }

    #[test]
    fn test_normalize_domain_rejects_invalid() {
        assert!(matches!(normalize_domain(""), Err(ScanError::InvalidDomain(_))));
        assert!(matches!(normalize_domain("http://"), Err(ScanError::InvalidDomain(_))));
        assert!(matches!(
            normalize_domain("not a domain"),
            Err(ScanError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_default_candidates_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for path in DEFAULT_CANDIDATE_PATHS {
            assert!(path.starts_with('/'), "{} must be absolute", path);
            assert!(seen.insert(*path), "{} listed twice", path);
        }
        assert_eq!(DEFAULT_CANDIDATE_PATHS[0], "/sitemap.xml");
    }

    #[tokio::test]
    async fn test_invalid_domain_makes_no_requests() {
        let result = test_locator().locate("http://").await;
        assert!(matches!(result, Err(ScanError::InvalidDomain(_))));
    }

    #[tokio::test]
    async fn test_robots_directive_skips_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("User-agent: *\nSitemap: https://example.com/s1.xml\n"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let sitemap = test_locator().locate(&mock_server.uri()).await.unwrap();

        assert_eq!(sitemap, "https://example.com/s1.xml");
        assert_eq!(requested_paths(&mock_server).await, vec!["/robots.txt"]);
    }

    #[tokio::test]
    async fn test_third_candidate_wins() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow:\n"))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/three.xml"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/four.xml"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let locator = test_locator().with_candidates(["/one.xml", "/two.xml", "/three.xml", "/four.xml"]);
        let sitemap = locator.locate(&mock_server.uri()).await.unwrap();

        assert_eq!(sitemap, format!("{}/three.xml", mock_server.uri()));
        assert_eq!(
            requested_paths(&mock_server).await,
            vec!["/robots.txt", "/one.xml", "/two.xml", "/three.xml"]
        );
    }

    #[tokio::test]
    async fn test_missing_robots_falls_back_to_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let sitemap = test_locator().locate(&mock_server.uri()).await.unwrap();

        assert_eq!(sitemap, format!("{}/sitemap.xml", mock_server.uri()));
        assert_eq!(
            requested_paths(&mock_server).await,
            vec!["/robots.txt", "/sitemap.xml"]
        );
    }

    #[tokio::test]
    async fn test_only_exact_200_counts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/one.xml"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/two.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let locator = test_locator().with_candidates(["/one.xml", "/two.xml"]);
        let sitemap = locator.locate(&mock_server.uri()).await.unwrap();

        assert_eq!(sitemap, format!("{}/two.xml", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_no_candidate_found() {
        let mock_server = MockServer::start().await;

        let locator = test_locator().with_candidates(["/one.xml", "/two.xml"]);
        let result = locator.locate(&mock_server.uri()).await;

        let authority = mock_server.address().to_string();
        match result {
            Err(ScanError::NotFound(domain)) => assert_eq!(domain, authority),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(
            requested_paths(&mock_server).await,
            vec!["/robots.txt", "/one.xml", "/two.xml"]
        );
    }

    #[tokio::test]
    async fn test_scheme_less_domain_matches_explicit_scheme() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/two.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let locator = test_locator().with_candidates(["/one.xml", "/two.xml"]);
        let bare = mock_server.address().to_string();

        let from_bare = locator.locate(&bare).await.unwrap();
        let from_http = locator.locate(&format!("http://{}", bare)).await.unwrap();
        let from_https = locator.locate(&format!("https://{}", bare)).await.unwrap();

        assert_eq!(from_bare, from_http);
        assert_eq!(from_bare, from_https);
        assert_eq!(requested_paths(&mock_server).await.len(), 9);
    }

    #[tokio::test]
    async fn test_robots_request_error_is_fatal() {
        // Bind then release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let result = test_locator().locate(&address.to_string()).await;
        assert!(matches!(result, Err(ScanError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_candidate_request_error_stops_probing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow.xml"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/fast.xml"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let locator = Locator::with_timeout(Duration::from_millis(200))
            .unwrap()
            .with_probe_scheme("http")
            .with_candidates(["/slow.xml", "/fast.xml"]);

        let result = locator.locate(&mock_server.uri()).await;
        assert!(matches!(result, Err(ScanError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_concurrent_probing_keeps_candidate_order() {
        let mock_server = MockServer::start().await;

        // The earlier candidate answers last but must still win.
        Mock::given(method("GET"))
            .and(path("/two.xml"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/three.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let locator = test_locator()
            .with_candidates(["/one.xml", "/two.xml", "/three.xml"])
            .with_probe_concurrency(3);

        let sitemap = locator.locate(&mock_server.uri()).await.unwrap();
        assert_eq!(sitemap, format!("{}/two.xml", mock_server.uri()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_locate_runs_on_spawned_task() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sitemap_index.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let locator = test_locator()
            .with_candidates(["/sitemap.xml", "/sitemap_index.xml"])
            .with_probe_concurrency(2);
        let uri = mock_server.uri();

        let sitemap = tokio::spawn(async move { locator.locate(&uri).await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sitemap, format!("{}/sitemap_index.xml", mock_server.uri()));
    }
}
