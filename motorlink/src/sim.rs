//! Simulated motor controller
//!
//! Plays the device side of a [`DeviceEndpoint`]: it reads each value the
//! controller writes, applies it to an internal model and reports query
//! responses back through the shared attribute. Values that are not
//! frames are echoed back as `ERR <escaped>` text, the way the firmware
//! answers unknown UART input.

use bytes::Bytes;
use motorlink_core::{escape, frame, Frame, Opcode, PayloadValue, ProtocolConfig, Response};
use motorlink_transport::DeviceEndpoint;
use tracing::{debug, trace, warn};

use crate::error::Result;

/// Steps needed to move the cover by one percent
pub const STEPS_PER_PERCENT: i32 = 16;

/// Internal model of a motor controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedMotor {
    pub position: u8,
    pub speed: u16,
    pub min_limit: bool,
    pub max_limit: bool,
    pub stopped: bool,
    protocol: ProtocolConfig,
}

impl Default for SimulatedMotor {
    fn default() -> Self {
        Self::new(ProtocolConfig::STANDARD)
    }
}

impl SimulatedMotor {
    pub fn new(protocol: ProtocolConfig) -> Self {
        Self {
            position: 0,
            speed: 100,
            min_limit: false,
            max_limit: false,
            stopped: true,
            protocol,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.min_limit && self.max_limit
    }

    /// Handle one written attribute value, returning the report to send
    pub fn handle(&mut self, value: &[u8]) -> Option<Bytes> {
        let Some(bytes) = frame::strip_length_prefix(value) else {
            debug!("Simulator got a value without a matching length prefix");
            return Some(reject(value));
        };

        let parsed = match Frame::parse_with(bytes, &self.protocol) {
            Ok(parsed) if self.protocol.supports(parsed.opcode) => parsed,
            Ok(parsed) => {
                debug!("{} is outside the {} command set", parsed.opcode, self.protocol.variant);
                return Some(reject(value));
            }
            Err(e) if e.is_envelope_error() => {
                debug!("Simulator got non-frame input: {}", e);
                return Some(reject(value));
            }
            Err(e) => {
                warn!("Simulator got a malformed frame: {}", e);
                return Some(reject(value));
            }
        };

        trace!("Simulator handling {}", parsed);

        let response = match (parsed.opcode, parsed.value()) {
            (Opcode::Move, PayloadValue::Int32(steps)) => {
                let delta = steps / STEPS_PER_PERCENT;
                self.position = (i32::from(self.position) + delta).clamp(0, 100) as u8;
                self.stopped = false;
                None
            }
            (Opcode::SetPosition, PayloadValue::UInt8(position)) => {
                self.position = position.min(100);
                self.stopped = false;
                None
            }
            (Opcode::SetSpeed, PayloadValue::UInt16(speed)) => {
                self.speed = speed;
                None
            }
            (Opcode::SetMinLimit, _) => {
                self.min_limit = true;
                None
            }
            (Opcode::SetMaxLimit, _) => {
                self.max_limit = true;
                None
            }
            (Opcode::ResetCalibration, _) => {
                self.min_limit = false;
                self.max_limit = false;
                None
            }
            (Opcode::Stop, _) => {
                self.stopped = true;
                return Some(Bytes::from_static(b"stopped"));
            }
            (Opcode::GetPosition, _) => Some(Response::Position(self.position)),
            (Opcode::GetCalibration, _) => {
                Some(Response::Calibration(u8::from(self.is_calibrated())))
            }
            (Opcode::GetSpeed, _) => Some(Response::Speed(self.speed)),
            _ => None,
        };

        response.map(|response| response.frame().encode_with(&self.protocol).freeze())
    }

    /// Serve an endpoint until the controller side goes away
    pub async fn run(mut self, mut endpoint: DeviceEndpoint) -> Result<Self> {
        while let Some(value) = endpoint.next_write().await {
            if let Some(report) = self.handle(&value) {
                endpoint.report(report)?;
            }
        }

        debug!("Simulator endpoint closed");
        Ok(self)
    }
}

/// Firmware answer to input it cannot execute
fn reject(value: &[u8]) -> Bytes {
    Bytes::from(format!("ERR {}", escape::escape(value)))
}
