use thiserror::Error;

/// Why a provider call was inconclusive. Absorbed by the chain.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("{provider}: request failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider}: HTTP status {status}")]
    Status { provider: String, status: u16 },
    #[error("{provider}: unparseable response: {source}")]
    Body {
        provider: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{provider}: timed out")]
    Timeout { provider: String },
}

impl FallbackError {
    /// Drops the request URL: its query carries the API key.
    pub(crate) fn http(provider: &str, source: reqwest::Error) -> Self {
        Self::Http {
            provider: provider.to_string(),
            source: source.without_url(),
        }
    }
}
