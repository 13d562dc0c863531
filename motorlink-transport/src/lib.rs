//! Transport layer for motorlink
//!
//! The device exposes one shared attribute. The controller writes encoded
//! commands into it and later receives reports of its new value. A
//! transport moves those values; it knows nothing about frames.

pub mod error;
pub mod memory;
pub mod udp;

pub use error::{Error, Result};
pub use memory::{DeviceEndpoint, MemoryTransport};
pub use udp::UdpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Default UDP port of the coordinator bridge
pub const DEFAULT_PORT: u16 = 4371;

/// Default time to wait for an attribute report
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest value a character-string attribute can hold
pub const MAX_VALUE_SIZE: usize = 254;

/// Access to the shared device-state value
///
/// Outbound values are written exactly as given (already length-prefixed
/// by the codec). Inbound values are the raw attribute contents.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;
    
    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Write a new attribute value
    async fn write_value(&mut self, value: &[u8]) -> Result<()>;
    
    /// Wait for the next reported attribute value
    async fn read_value(&mut self, timeout: Duration) -> Result<BytesMut>;
    
    /// Human-readable description of the device endpoint
    fn endpoint(&self) -> String;
}

pub(crate) fn check_value_size(value: &[u8], max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::ValueTooLarge {
            size: value.len(),
            max,
        });
    }
    Ok(())
}
