use sitemapper_scanner::{DEFAULT_CANDIDATE_PATHS, DEFAULT_PROBE_TIMEOUT};
use std::time::Duration;

/// Settings for building an [`Extractor`](crate::extract::Extractor).
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Timeout for the robots fetch and each candidate probe.
    pub probe_timeout: Duration,
    /// Candidate probes allowed in flight at once. 1 probes strictly in sequence.
    pub probe_concurrency: usize,
    /// Candidate paths, in probe order.
    pub candidates: Vec<String>,
    /// Scheme used to build probe addresses.
    pub probe_scheme: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            probe_concurrency: 1,
            candidates: DEFAULT_CANDIDATE_PATHS.iter().map(|p| p.to_string()).collect(),
            probe_scheme: "https".to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_probe_timeout_secs(mut self, secs: u64) -> Self {
        self.probe_timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_probe_concurrency(mut self, concurrency: usize) -> Self {
        self.probe_concurrency = concurrency.max(1);
        self
    }

    pub fn with_probe_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.probe_scheme = scheme.into();
        self
    }

    pub fn with_candidates<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = paths.into_iter().map(Into::into).collect();
        self
    }
}
