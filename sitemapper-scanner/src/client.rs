use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = "Sitemapper/0.1 (https://github.com/trapdoorsec/sitemapper)";

/// Builds the HTTP client shared by the locator and the resolver.
///
/// `None` leaves the request timeout unbounded; sitemap fetches rely on that.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout).connect_timeout(timeout);
    }

    builder.build().map_err(ScanError::ClientBuild)
}
