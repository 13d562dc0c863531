//! UDP bridge transport
//!
//! Talks to a coordinator-side bridge that forwards attribute writes to the
//! device and relays its attribute reports back. One datagram carries one
//! attribute value in either direction.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{check_value_size, error::*, Transport, MAX_VALUE_SIZE};

/// UDP transport to a coordinator bridge
pub struct UdpTransport {
    addr: String,
    port: u16,
    socket: Option<UdpSocket>,
    remote_addr: Option<SocketAddr>,
    max_value_len: usize,
}

impl UdpTransport {
    /// Create new UDP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket: None,
            remote_addr: None,
            max_value_len: MAX_VALUE_SIZE,
        }
    }

    /// Set the largest value accepted for writing
    pub fn with_max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = max;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.remote_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addr = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .next()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.remote_addr = Some(addr);
        Ok(addr)
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let remote = self.resolve_addr().await?;

        debug!("Connecting to bridge {} via UDP...", remote);

        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;

        // Sets default send/recv target
        socket.connect(remote).await?;

        debug!("Connected to bridge {}", remote);

        self.socket = Some(socket);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.socket.take().is_some() {
            debug!("Disconnecting from {}...", self.endpoint());
        }

        self.remote_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    async fn write_value(&mut self, value: &[u8]) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;
        check_value_size(value, self.max_value_len)?;

        trace!("Writing {} bytes via UDP: {}", value.len(), hex::encode(value));

        socket.send(value).await?;

        Ok(())
    }

    async fn read_value(&mut self, read_timeout: Duration) -> Result<BytesMut> {
        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::zeroed(MAX_VALUE_SIZE + 1);

        let n = timeout(read_timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| {
                warn!("Read timeout after {:?}", read_timeout);
                Error::ReadTimeout
            })?
            .map_err(|e| {
                warn!("Read error: {}", e);
                Error::Io(e)
            })?;

        // Truncate to actual received size
        buf.truncate(n);

        trace!(
            "Received {} bytes via UDP: {}",
            n,
            hex::encode(&buf)
        );

        Ok(buf)
    }

    fn endpoint(&self) -> String {
        self.remote_addr
            .map(|addr| format!("udp://{}", addr))
            .unwrap_or_else(|| format!("udp://{}:{}", self.addr, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_udp_transport_create() {
        let transport = UdpTransport::new("127.0.0.1", 4371);
        assert!(!transport.is_connected());
        assert_eq!(transport.endpoint(), "udp://127.0.0.1:4371");
    }

    #[tokio::test]
    async fn test_udp_transport_invalid_address() {
        let mut transport = UdpTransport::new("invalid..address", 4371);

        let result = transport.connect().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_udp_write_requires_connect() {
        let mut transport = UdpTransport::new("127.0.0.1", 4371);
        let result = transport.write_value(&[0x01]).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_udp_roundtrip_with_local_bridge() {
        let bridge = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bridge_addr = bridge.local_addr().unwrap();

        let mut transport = UdpTransport::new("127.0.0.1", bridge_addr.port());
        transport.connect().await.unwrap();

        transport.write_value(&[0x05, 0xAA, 0x01, 0x0B, 0x0A, 0x55]).await.unwrap();

        let mut buf = [0u8; 64];
        let (n, peer) = bridge.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &[0x05, 0xAA, 0x01, 0x0B, 0x0A, 0x55]);

        bridge.send_to(&[0xAA, 0x03, 0x0B, 0x01, 0xF4, 0xFD, 0x55], peer).await.unwrap();

        let value = transport.read_value(Duration::from_secs(1)).await.unwrap();
        assert_eq!(&value[..], &[0xAA, 0x03, 0x0B, 0x01, 0xF4, 0xFD, 0x55]);

        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_udp_value_too_large() {
        let bridge = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = bridge.local_addr().unwrap().port();

        let mut transport = UdpTransport::new("127.0.0.1", port).with_max_value_len(8);
        transport.connect().await.unwrap();

        let result = transport.write_value(&[0u8; 9]).await;
        assert!(matches!(result, Err(Error::ValueTooLarge { size: 9, max: 8 })));
    }
}
