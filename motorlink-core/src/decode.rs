//! Dispatching decoder for attribute reports
//!
//! Every value the device reports through the shared attribute goes
//! through [`decode`]. The outcome follows three rules:
//!
//! 1. Not a frame (too short, wrong markers): the whole input is rendered
//!    as escaped text.
//! 2. A frame with a bad checksum: nothing at all. Corrupted binary is
//!    dropped instead of surfacing as garbled text.
//! 3. A valid frame: query responses become a [`Response`]; any other
//!    opcode is rendered as escaped text, like rule 1.
//!
//! Decoding is pure. Decoding the same bytes twice gives the same result.

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use motorlink_types::StateUpdate;
use tracing::{debug, trace, warn};

use crate::{
    checksum,
    command::Opcode,
    config::ProtocolConfig,
    escape,
    frame::{self, Frame},
};

/// Structured report carried by a query response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// Current position in percent
    Position(u8),

    /// Raw calibration status byte (0x01 = calibrated)
    Calibration(u8),

    /// Current speed in rpm
    Speed(u16),
}

impl Response {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Position(_) => Opcode::GetPosition,
            Self::Calibration(_) => Opcode::GetCalibration,
            Self::Speed(_) => Opcode::GetSpeed,
        }
    }

    /// Payload bytes exactly as carried on the wire
    pub fn payload(&self) -> Bytes {
        match *self {
            Self::Position(position) => Bytes::copy_from_slice(&[position]),
            Self::Calibration(status) => Bytes::copy_from_slice(&[status]),
            Self::Speed(speed) => Bytes::copy_from_slice(&speed.to_be_bytes()),
        }
    }

    /// Frame the device sends for this report
    pub fn frame(&self) -> Frame {
        Frame {
            opcode: self.opcode(),
            payload: self.payload(),
        }
    }

    pub fn is_calibrated(&self) -> Option<bool> {
        match self {
            Self::Calibration(status) => Some(*status == 0x01),
            _ => None,
        }
    }
}

/// Outcome of decoding one attribute report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Valid query response
    Response(Response),

    /// Anything else worth showing: free-form device output or a frame
    /// with no structured meaning to the controller
    Text(String),
}

impl Decoded {
    fn text(bytes: &[u8]) -> Self {
        Self::Text(escape::escape(bytes))
    }

    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Response(_) => None,
        }
    }

    /// Project onto the semantic fields it updates
    pub fn to_update(&self) -> StateUpdate {
        match self {
            Self::Response(Response::Position(position)) => StateUpdate::position(*position),
            Self::Response(Response::Calibration(status)) => StateUpdate::calibrated(*status == 0x01),
            Self::Response(Response::Speed(speed)) => StateUpdate::speed(*speed),
            Self::Text(text) => StateUpdate::action(text.clone()),
        }
    }
}

/// Decode a report using the standard protocol
///
/// Returns `None` when the input is a frame whose checksum does not match.
///
/// # Examples
///
/// ```
/// use motorlink_core::{decode, Decoded, Response};
///
/// let report = [0xAA, 0x02, 0x05, 0x32, 0x35, 0x55];
/// assert_eq!(decode(&report), Some(Decoded::Response(Response::Position(50))));
///
/// assert_eq!(decode(&[0x41, 0x01, 0xFF]), Some(Decoded::Text("A\\x01\\xff".into())));
/// ```
pub fn decode(bytes: &[u8]) -> Option<Decoded> {
    decode_with(bytes, &ProtocolConfig::STANDARD)
}

/// Decode a report
pub fn decode_with(bytes: &[u8], config: &ProtocolConfig) -> Option<Decoded> {
    trace!("Decoding {} bytes: {}", bytes.len(), hex::encode(bytes));

    if let Err(e) = frame::check_envelope(bytes, config) {
        debug!("Not a frame ({}), rendering as text", e);
        return Some(Decoded::text(bytes));
    }

    let last = bytes.len() - 1;
    let expected = checksum::fold(&bytes[1..last - 1]);
    let received = bytes[last - 1];
    if expected != received {
        warn!(
            "Dropping frame with bad checksum: expected 0x{:02X}, received 0x{:02X}",
            expected, received
        );
        return None;
    }

    let response = match Opcode::try_from(bytes[2]) {
        Ok(opcode) if config.supports(opcode) => dispatch(opcode, bytes),
        Ok(opcode) => {
            debug!("{} is outside the {} command set", opcode, config.variant);
            None
        }
        Err(e) => {
            debug!("{}", e);
            None
        }
    };

    match response {
        Some(response) => {
            debug!("Decoded {:?}", response);
            Some(Decoded::Response(response))
        }
        None => Some(Decoded::text(bytes)),
    }
}

/// Map a checksum-valid frame onto a structured response
///
/// Fields are read at fixed offsets from the start of the frame, whatever
/// LEN says. The envelope check guarantees at least five bytes, so `bytes[3]`
/// and `bytes[3..5]` are always present. On a short frame they overlap the
/// checksum or end marker.
fn dispatch(opcode: Opcode, bytes: &[u8]) -> Option<Response> {
    match opcode {
        Opcode::GetPosition => Some(Response::Position(bytes[3])),
        Opcode::GetCalibration => Some(Response::Calibration(bytes[3])),
        Opcode::GetSpeed => Some(Response::Speed(BigEndian::read_u16(&bytes[3..5]))),

        // Fire-and-forget: the device never reports these with data
        Opcode::Move
        | Opcode::SetPosition
        | Opcode::SetMinLimit
        | Opcode::SetMaxLimit
        | Opcode::ResetCalibration
        | Opcode::SetSpeed
        | Opcode::Stop => None,
    }
}
