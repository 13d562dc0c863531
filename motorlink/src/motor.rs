//! High-level motor interface

use std::time::Duration;

use tracing::{debug, info, trace};

use motorlink_core::{decode_with, ProtocolConfig};
use motorlink_transport::{Transport, UdpTransport, DEFAULT_READ_TIMEOUT};
use motorlink_types::{Calibration, MotorState, StateUpdate};

use crate::command::{MotorCommand, Query};
use crate::error::{Error, Result};

/// Motor controller behind a shared attribute
///
/// Commands are written to the attribute; reports of its new value are
/// picked up with [`Motor::poll`] and folded into [`Motor::state`].
///
/// The protocol has no correlation id. If several queries are written
/// before a report arrives, the report cannot be matched to the query
/// that caused it. `Motor` does not queue or pair requests; callers that
/// need pairing must wait for each report before the next query.
///
/// # Examples
///
/// ```no_run
/// use motorlink::Motor;
///
/// #[tokio::main]
/// async fn main() -> motorlink::Result<()> {
///     let mut motor = Motor::udp("192.168.1.50", 4371);
///     
///     motor.connect().await?;
///     motor.set("position", "40").await?;
///     motor.get("position").await?;
///     
///     if let Some(update) = motor.poll().await? {
///         println!("Report: {:?}", update);
///     }
///     println!("{}", motor.state());
///     
///     motor.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Motor {
    transport: Box<dyn Transport>,
    protocol: ProtocolConfig,
    timeout: Duration,
    state: MotorState,
}

impl Motor {
    /// Create a motor on top of any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            protocol: ProtocolConfig::STANDARD,
            timeout: DEFAULT_READ_TIMEOUT,
            state: MotorState::new(),
        }
    }

    /// Create a motor reached through a UDP coordinator bridge
    pub fn udp(addr: impl Into<String>, port: u16) -> Self {
        Self::new(UdpTransport::new(addr, port))
    }

    /// Set report timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set protocol configuration (e.g. [`ProtocolConfig::COMPAT`])
    pub fn with_protocol(mut self, protocol: ProtocolConfig) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }

    /// Last known state
    pub fn state(&self) -> &MotorState {
        &self.state
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Connect to motor
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.endpoint());

        self.transport.connect().await?;

        info!("Connected to {}", self.transport.endpoint());
        Ok(())
    }

    /// Disconnect from motor
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.endpoint());
        self.transport.disconnect().await?;

        info!("Disconnected");
        Ok(())
    }

    /// Write a command to the attribute
    pub async fn send(&mut self, command: &MotorCommand) -> Result<()> {
        self.ensure_connected()?;

        debug!("Sending {}", command);

        let value = command.encode(&self.protocol)?;
        self.transport.write_value(&value).await?;

        Ok(())
    }

    /// Set a property from its key/value form
    pub async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let command = MotorCommand::from_property(key, value)?;
        self.send(&command).await
    }

    /// Request a property; the answer arrives through [`Motor::poll`]
    pub async fn get(&mut self, key: &str) -> Result<()> {
        let query = Query::from_property(key)?;
        self.query(query).await
    }

    pub async fn query(&mut self, query: Query) -> Result<()> {
        self.send(&MotorCommand::Query(query)).await
    }

    pub async fn open(&mut self) -> Result<()> {
        self.send(&MotorCommand::Open).await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.send(&MotorCommand::Close).await
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.send(&MotorCommand::Stop).await
    }

    /// Go to a position in percent (clamped to 100)
    pub async fn set_position(&mut self, position: u8) -> Result<()> {
        self.send(&MotorCommand::SetPosition(position)).await
    }

    /// Move by a signed number of steps
    pub async fn move_by(&mut self, steps: i32) -> Result<()> {
        self.send(&MotorCommand::Move(steps)).await
    }

    /// Set speed in rpm (0–500)
    pub async fn set_speed(&mut self, speed: u16) -> Result<()> {
        self.send(&MotorCommand::SetSpeed(speed)).await
    }

    pub async fn calibrate(&mut self, calibration: Calibration) -> Result<()> {
        self.send(&MotorCommand::Calibrate(calibration)).await
    }

    /// Wait for the next attribute report and apply it
    ///
    /// Returns `Ok(None)` when the report was a frame with a bad checksum;
    /// such reports are dropped and do not touch the state.
    pub async fn poll(&mut self) -> Result<Option<StateUpdate>> {
        self.ensure_connected()?;

        let value = self.transport.read_value(self.timeout).await?;

        let Some(decoded) = decode_with(&value, &self.protocol) else {
            debug!("Report dropped");
            return Ok(None);
        };

        let update = decoded.to_update();
        self.state.apply(&update);

        trace!("State: {}", self.state);

        Ok(Some(update))
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}
