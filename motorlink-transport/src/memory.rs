//! In-process transport
//!
//! Connects a controller to a device endpoint living in the same process,
//! typically a simulated motor in tests. Each written value is delivered to
//! the device once; each reported value is delivered to the controller once.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{check_value_size, error::*, Transport, MAX_VALUE_SIZE};

/// Controller side of an in-memory link
pub struct MemoryTransport {
    name: String,
    to_device: mpsc::UnboundedSender<Bytes>,
    from_device: mpsc::UnboundedReceiver<Bytes>,
    connected: bool,
}

/// Device side of an in-memory link
pub struct DeviceEndpoint {
    from_controller: mpsc::UnboundedReceiver<Bytes>,
    to_controller: mpsc::UnboundedSender<Bytes>,
}

impl MemoryTransport {
    /// Create a connected pair of endpoints
    pub fn pair(name: impl Into<String>) -> (MemoryTransport, DeviceEndpoint) {
        let (to_device, from_controller) = mpsc::unbounded_channel();
        let (to_controller, from_device) = mpsc::unbounded_channel();

        let transport = MemoryTransport {
            name: name.into(),
            to_device,
            from_device,
            connected: false,
        };
        let device = DeviceEndpoint {
            from_controller,
            to_controller,
        };

        (transport, device)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }
        if self.to_device.is_closed() {
            return Err(Error::ConnectionClosed);
        }

        debug!("Connected to {} (in-memory)", self.name);
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.connected {
            debug!("Disconnecting from {}...", self.name);
        }
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn write_value(&mut self, value: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        check_value_size(value, MAX_VALUE_SIZE)?;

        trace!("Writing {} bytes: {}", value.len(), hex::encode(value));

        self.to_device
            .send(Bytes::copy_from_slice(value))
            .map_err(|_| Error::ConnectionClosed)
    }

    async fn read_value(&mut self, read_timeout: Duration) -> Result<BytesMut> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        let value = timeout(read_timeout, self.from_device.recv())
            .await
            .map_err(|_| Error::ReadTimeout)?
            .ok_or(Error::ConnectionClosed)?;

        trace!("Received {} bytes: {}", value.len(), hex::encode(&value));

        Ok(BytesMut::from(&value[..]))
    }

    fn endpoint(&self) -> String {
        format!("memory://{}", self.name)
    }
}

impl DeviceEndpoint {
    /// Wait for the next value written by the controller
    ///
    /// Returns `None` once the controller side has been dropped.
    pub async fn next_write(&mut self) -> Option<Bytes> {
        self.from_controller.recv().await
    }

    /// Report a new attribute value to the controller
    pub fn report(&self, value: impl Into<Bytes>) -> Result<()> {
        let value = value.into();
        check_value_size(&value, MAX_VALUE_SIZE)?;
        self.to_controller
            .send(value)
            .map_err(|_| Error::ConnectionClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport_create() {
        let (transport, _device) = MemoryTransport::pair("motor");
        assert!(!transport.is_connected());
        assert_eq!(transport.endpoint(), "memory://motor");
    }

    #[tokio::test]
    async fn test_write_requires_connect() {
        let (mut transport, _device) = MemoryTransport::pair("motor");
        let result = transport.write_value(&[0x01]).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_connect_twice() {
        let (mut transport, _device) = MemoryTransport::pair("motor");
        transport.connect().await.unwrap();
        assert!(matches!(transport.connect().await, Err(Error::AlreadyConnected)));
    }

    #[tokio::test]
    async fn test_values_flow_both_ways() {
        let (mut transport, mut device) = MemoryTransport::pair("motor");
        transport.connect().await.unwrap();

        transport.write_value(&[0x05, 0xAA, 0x01, 0x0C, 0x0D, 0x55]).await.unwrap();
        let written = device.next_write().await.unwrap();
        assert_eq!(&written[..], &[0x05, 0xAA, 0x01, 0x0C, 0x0D, 0x55]);

        device.report(vec![0xAA, 0x02, 0x05, 0x00, 0x07, 0x55]).unwrap();
        let value = transport.read_value(Duration::from_secs(1)).await.unwrap();
        assert_eq!(&value[..], &[0xAA, 0x02, 0x05, 0x00, 0x07, 0x55]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_timeout() {
        let (mut transport, _device) = MemoryTransport::pair("motor");
        transport.connect().await.unwrap();

        let result = transport.read_value(Duration::from_millis(100)).await;
        assert!(matches!(result, Err(Error::ReadTimeout)));
    }

    #[tokio::test]
    async fn test_device_dropped() {
        let (mut transport, device) = MemoryTransport::pair("motor");
        transport.connect().await.unwrap();
        drop(device);

        let result = transport.read_value(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::ConnectionClosed)));
        assert!(matches!(
            transport.write_value(&[0x01]).await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_value_too_large() {
        let (mut transport, _device) = MemoryTransport::pair("motor");
        transport.connect().await.unwrap();

        let result = transport.write_value(&[0u8; MAX_VALUE_SIZE + 1]).await;
        assert!(matches!(result, Err(Error::ValueTooLarge { size: 255, max: 254 })));
    }
}
