use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_socks::tcp::Socks5Stream;

use super::{ProxyConfig, TransportError};

/// Byte stream handed to protocol code, whatever carried it.
pub trait ProbeStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> ProbeStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub type BoxedStream = Box<dyn ProbeStream>;

/// Connection factory threaded into every outbound probe.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, host: &str, port: u16) -> Result<BoxedStream, TransportError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Plain TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectConnector;

#[async_trait]
impl Connector for DirectConnector {
    async fn connect(&self, host: &str, port: u16) -> Result<BoxedStream, TransportError> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| TransportError::Connect {
                target: format!("{host}:{port}"),
                source,
            })?;
        Ok(Box::new(stream))
    }

    fn describe(&self) -> String {
        "direct".to_string()
    }
}

/// SOCKS5 tunnel; the relay resolves the target hostname.
#[derive(Debug, Clone)]
pub struct Socks5Connector {
    proxy: ProxyConfig,
}

impl Socks5Connector {
    pub fn new(proxy: ProxyConfig) -> Self {
        Self { proxy }
    }
}

#[async_trait]
impl Connector for Socks5Connector {
    async fn connect(&self, host: &str, port: u16) -> Result<BoxedStream, TransportError> {
        let relay = (self.proxy.host.as_str(), self.proxy.port);
        let target = (host, port);
        let result = match self.proxy.credentials() {
            Some((user, pass)) => Socks5Stream::connect_with_password(relay, target, user, pass).await,
            None => Socks5Stream::connect(relay, target).await,
        };
        let stream = result.map_err(|source| TransportError::Socks {
            target: format!("{host}:{port}"),
            source,
        })?;
        Ok(Box::new(stream))
    }

    fn describe(&self) -> String {
        format!("socks5://{}", self.proxy.address())
    }
}

/// Direct when `proxy` is `None`, tunnelled otherwise.
pub fn connector_for(proxy: Option<&ProxyConfig>) -> Arc<dyn Connector> {
    match proxy {
        Some(cfg) => Arc::new(Socks5Connector::new(cfg.clone())),
        None => Arc::new(DirectConnector),
    }
}

/// Connect with an upper bound on the whole attempt.
pub async fn connect_with_timeout(
    connector: &dyn Connector,
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<BoxedStream, TransportError> {
    match tokio::time::timeout(timeout, connector.connect(host, port)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout {
            target: format!("{host}:{port}"),
            seconds: timeout.as_secs(),
        }),
    }
}
