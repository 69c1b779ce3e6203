use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to validate {0}")]
    InvalidDomain(String),

    #[error("HTTP request failed: {0}")]
    FetchFailed(#[from] reqwest::Error),

    #[error("Couldn't find sitemap for {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    ParseFailed(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
