use thiserror::Error;

/// Failures surfaced by catalog client operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Upstream answered with a non-success status.
    #[error("HTTP error {status}")]
    Http { status: u16 },
    #[error("No pages available for this chapter")]
    NoPagesAvailable,
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("invalid url '{0}'")]
    InvalidUrl(String),
}

impl CatalogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Http { status } => Some(*status),
            CatalogError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
