//! Typed controller requests

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    command::Opcode,
    config::ProtocolConfig,
    error::{Error, Result},
    frame::Frame,
};

/// A request the controller can send, with its payload already typed
///
/// Building frames from a `Request` cannot produce a payload of the
/// wrong width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// Move by a signed number of steps
    Move(i32),
    /// Go to an absolute position (percent)
    SetPosition(u8),
    SetMinLimit,
    SetMaxLimit,
    GetPosition,
    ResetCalibration,
    GetCalibration,
    /// Set speed in rpm
    SetSpeed(u16),
    GetSpeed,
    Stop,
}

impl Request {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Move(_) => Opcode::Move,
            Self::SetPosition(_) => Opcode::SetPosition,
            Self::SetMinLimit => Opcode::SetMinLimit,
            Self::SetMaxLimit => Opcode::SetMaxLimit,
            Self::GetPosition => Opcode::GetPosition,
            Self::ResetCalibration => Opcode::ResetCalibration,
            Self::GetCalibration => Opcode::GetCalibration,
            Self::SetSpeed(_) => Opcode::SetSpeed,
            Self::GetSpeed => Opcode::GetSpeed,
            Self::Stop => Opcode::Stop,
        }
    }

    /// Payload bytes, big-endian
    pub fn payload(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.opcode().payload_width());

        match *self {
            Self::Move(steps) => buf.put_i32(steps),
            Self::SetPosition(position) => buf.put_u8(position),
            Self::SetSpeed(speed) => buf.put_u16(speed),
            Self::SetMinLimit
            | Self::SetMaxLimit
            | Self::GetPosition
            | Self::ResetCalibration
            | Self::GetCalibration
            | Self::GetSpeed
            | Self::Stop => {}
        }

        buf.freeze()
    }

    pub fn frame(&self) -> Frame {
        Frame {
            opcode: self.opcode(),
            payload: self.payload(),
        }
    }

    /// Encode as the value written to the shared attribute
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOpcode`] if the configured command set
    /// does not contain this request.
    pub fn encode(&self, config: &ProtocolConfig) -> Result<BytesMut> {
        let opcode = self.opcode();
        if !config.supports(opcode) {
            return Err(Error::UnsupportedOpcode {
                opcode,
                variant: config.variant,
            });
        }

        Ok(self.frame().encode_value_with(config))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(steps) => write!(f, "{}({})", self.opcode().name(), steps),
            Self::SetPosition(position) => write!(f, "{}({}%)", self.opcode().name(), position),
            Self::SetSpeed(speed) => write!(f, "{}({} rpm)", self.opcode().name(), speed),
            _ => f.write_str(self.opcode().name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_widths_match_table() {
        let requests = [
            Request::Move(-1),
            Request::SetPosition(1),
            Request::SetMinLimit,
            Request::SetMaxLimit,
            Request::GetPosition,
            Request::ResetCalibration,
            Request::GetCalibration,
            Request::SetSpeed(1),
            Request::GetSpeed,
            Request::Stop,
        ];

        for request in requests {
            assert_eq!(request.payload().len(), request.opcode().payload_width(), "{request}");
        }
    }

    #[test]
    fn test_encode_speed() {
        let value = Request::SetSpeed(500).encode(&ProtocolConfig::STANDARD).unwrap();
        assert_eq!(&value[..], &[0x07, 0xAA, 0x03, 0x0A, 0x01, 0xF4, 0xFC, 0x55]);
    }

    #[test]
    fn test_encode_queries() {
        let config = ProtocolConfig::STANDARD;
        assert_eq!(
            &Request::GetPosition.encode(&config).unwrap()[..],
            &[0x05, 0xAA, 0x01, 0x05, 0x04, 0x55]
        );
        assert_eq!(
            &Request::GetCalibration.encode(&config).unwrap()[..],
            &[0x05, 0xAA, 0x01, 0x07, 0x06, 0x55]
        );
        assert_eq!(
            &Request::GetSpeed.encode(&config).unwrap()[..],
            &[0x05, 0xAA, 0x01, 0x0B, 0x0A, 0x55]
        );
    }

    #[test]
    fn test_encode_matches_raw_encoder() {
        let request = Request::Move(800);
        assert_eq!(
            request.encode(&ProtocolConfig::STANDARD).unwrap(),
            crate::frame::encode(Opcode::Move, &800i32.to_be_bytes())
        );
    }

    #[test]
    fn test_compat_rejects_speed() {
        let result = Request::SetSpeed(100).encode(&ProtocolConfig::COMPAT);
        assert_eq!(
            result,
            Err(Error::UnsupportedOpcode {
                opcode: Opcode::SetSpeed,
                variant: Variant::Compat,
            })
        );
        assert!(Request::SetMinLimit.encode(&ProtocolConfig::COMPAT).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Request::Move(-400).to_string(), "CMD_MOVE(-400)");
        assert_eq!(Request::Stop.to_string(), "CMD_STOP");
    }
}
