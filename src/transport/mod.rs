//! Outbound connections: direct TCP or a request-scoped SOCKS5 tunnel.
//!
//! Nothing here touches process-wide socket defaults; every probe receives an
//! explicit [`Connector`].

mod connector;
mod error;
mod proxy;

use std::time::Duration;

pub use connector::{
    BoxedStream, Connector, DirectConnector, ProbeStream, Socks5Connector, connect_with_timeout,
    connector_for,
};
pub use error::TransportError;
pub use proxy::{ProxyConfig, ProxyFields};

/// Well-known submission endpoint used by the proxy connectivity test.
pub const PROXY_TEST_TARGET: (&str, u16) = ("smtp.gmail.com", 587);

pub const PROXY_TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open one tunnelled connection to [`PROXY_TEST_TARGET`] and drop it.
pub async fn test_proxy(proxy: &ProxyConfig) -> Result<(), TransportError> {
    let connector = Socks5Connector::new(proxy.clone());
    test_proxy_with(&connector, PROXY_TEST_TARGET, PROXY_TEST_TIMEOUT).await
}

pub async fn test_proxy_with(
    connector: &dyn Connector,
    (host, port): (&str, u16),
    timeout: Duration,
) -> Result<(), TransportError> {
    let _stream = connect_with_timeout(connector, host, port, timeout).await?;
    tracing::info!(via = %connector.describe(), target = %format!("{host}:{port}"), "proxy test succeeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn direct_connector_reaches_loopback() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220 hi\r\n").await.unwrap();
        });

        let mut stream = DirectConnector.connect("127.0.0.1", port).await.unwrap();
        let mut buf = [0u8; 8];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"220 hi\r\n");
    }

    #[tokio::test]
    async fn proxy_test_fails_when_relay_is_closed() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let proxy = ProxyConfig::parse(&format!("127.0.0.1:{port}"), None, None).unwrap();
        let err = test_proxy_with(
            &Socks5Connector::new(proxy),
            ("smtp.example.com", 587),
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Socks { .. }));
    }

    #[tokio::test]
    async fn socks5_handshake_without_auth() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // greeting: VER, NMETHODS, METHODS...
            let mut head = [0u8; 2];
            socket.read_exact(&mut head).await.unwrap();
            let mut methods = vec![0u8; head[1] as usize];
            socket.read_exact(&mut methods).await.unwrap();
            socket.write_all(&[0x05, 0x00]).await.unwrap();
            // request: VER CMD RSV ATYP(domain) LEN NAME PORT
            let mut req = [0u8; 5];
            socket.read_exact(&mut req).await.unwrap();
            let mut rest = vec![0u8; req[4] as usize + 2];
            socket.read_exact(&mut rest).await.unwrap();
            socket
                .write_all(&[0x05, 0x00, 0x00, 0x01, 127, 0, 0, 1, 0, 25])
                .await
                .unwrap();
        });

        let proxy = ProxyConfig::parse(&format!("127.0.0.1:{port}"), None, None).unwrap();
        test_proxy_with(
            &Socks5Connector::new(proxy),
            ("smtp.example.com", 587),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
    }
}
