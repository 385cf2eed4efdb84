use thiserror::Error;

use crate::transport::TransportError;

/// Failure of one host attempt. Never terminal for the candidate: the probe
/// moves on to the next MX host.
#[derive(Debug, Error)]
pub enum SmtpProbeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("handshake with {host} timed out after {seconds}s")]
    Timeout { host: String, seconds: u64 },
}

impl SmtpProbeError {
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
