use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid proxy address '{value}': {reason}")]
    InvalidProxy { value: String, reason: &'static str },
    #[error("connection to {target} failed: {source}")]
    Connect {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("SOCKS5 tunnel to {target} failed: {source}")]
    Socks {
        target: String,
        #[source]
        source: tokio_socks::Error,
    },
    #[error("connection to {target} timed out after {seconds}s")]
    Timeout { target: String, seconds: u64 },
}

impl TransportError {
    pub(crate) fn invalid_proxy(value: &str, reason: &'static str) -> Self {
        Self::InvalidProxy {
            value: value.to_string(),
            reason,
        }
    }
}
