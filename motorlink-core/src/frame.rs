//! Frame structure and encoding/parsing

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{
    checksum,
    command::{Opcode, PayloadKind},
    config::ProtocolConfig,
    constants::{FRAME_OVERHEAD, MIN_FRAME_SIZE},
    error::{Error, Result},
};

/// Motor protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────┬──────┬──────┬─────────────┬──────────┬──────┐
/// │ STX  │ LEN  │ CMD  │   Payload   │ CHECKSUM │ ETX  │
/// │ 0xAA │  1B  │  1B  │   0-4 B     │    1B    │ 0x55 │
/// └──────┴──────┴──────┴─────────────┴──────────┴──────┘
/// ```
///
/// `LEN` counts the opcode and the payload. `CHECKSUM` is the XOR of
/// `LEN`, `CMD` and every payload byte. Multi-byte payloads are big-endian.
///
/// # Examples
///
/// ```
/// use motorlink_core::{Frame, Opcode};
///
/// let frame = Frame::new(Opcode::SetPosition, vec![50]).unwrap();
/// let encoded = frame.encode();
///
/// let parsed = Frame::parse(&encoded).unwrap();
/// assert_eq!(frame, parsed);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Opcode
    pub opcode: Opcode,

    /// Payload, width fixed by the command table
    pub payload: Bytes,
}

/// Payload interpreted according to the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadValue {
    Empty,
    UInt8(u8),
    UInt16(u16),
    Int32(i32),
}

impl Frame {
    /// Create a frame, checking the payload width against the command table
    ///
    /// Query opcodes accept both the empty request payload and the
    /// response payload the device sends back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadWidth`] if the table has no entry of that width.
    pub fn new(opcode: Opcode, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();

        if opcode.spec().kind_for_width(payload.len()).is_none() {
            return Err(Error::PayloadWidth {
                opcode,
                expected: opcode.payload_width(),
                actual: payload.len(),
            });
        }

        Ok(Self { opcode, payload })
    }

    /// Create a frame with empty payload
    pub fn empty(opcode: Opcode) -> Self {
        Self {
            opcode,
            payload: Bytes::new(),
        }
    }

    /// Value of the `LEN` byte
    pub fn length(&self) -> u8 {
        (1 + self.payload.len()) as u8
    }

    /// Calculate checksum for this frame
    pub fn checksum(&self) -> u8 {
        self.length() ^ u8::from(self.opcode) ^ checksum::fold(&self.payload)
    }

    /// Total frame size in bytes
    pub fn size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Interpret the payload according to the command table
    pub fn value(&self) -> PayloadValue {
        match self.opcode.spec().kind_for_width(self.payload.len()) {
            Some(PayloadKind::UInt8) => PayloadValue::UInt8(self.payload[0]),
            Some(PayloadKind::UInt16Be) => PayloadValue::UInt16(BigEndian::read_u16(&self.payload)),
            Some(PayloadKind::Int32Be) => PayloadValue::Int32(BigEndian::read_i32(&self.payload)),
            Some(PayloadKind::Empty) | None => PayloadValue::Empty,
        }
    }

    /// Encode frame to wire bytes using the standard markers
    ///
    /// ```
    /// use motorlink_core::{Frame, Opcode};
    ///
    /// let bytes = Frame::empty(Opcode::Stop).encode();
    /// assert_eq!(&bytes[..], &[0xAA, 0x01, 0x0C, 0x0D, 0x55]);
    /// ```
    pub fn encode(&self) -> BytesMut {
        self.encode_with(&ProtocolConfig::STANDARD)
    }

    /// Encode frame to wire bytes
    pub fn encode_with(&self, config: &ProtocolConfig) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(config.start_marker);
        buf.put_u8(self.length());
        buf.put_u8(self.opcode.into());
        buf.put_slice(&self.payload);
        buf.put_u8(self.checksum());
        buf.put_u8(config.end_marker);

        trace!("Encoded {}: {}", self, hex::encode(&buf));

        buf
    }

    /// Encode frame as the value written to the shared attribute
    ///
    /// The attribute write expects the frame preceded by its own byte count.
    pub fn encode_value(&self) -> BytesMut {
        self.encode_value_with(&ProtocolConfig::STANDARD)
    }

    pub fn encode_value_with(&self, config: &ProtocolConfig) -> BytesMut {
        let frame = self.encode_with(config);
        let mut buf = BytesMut::with_capacity(frame.len() + 1);
        buf.put_u8(frame.len() as u8);
        buf.put_slice(&frame);
        buf
    }

    /// Parse a frame using the standard markers
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with(bytes, &ProtocolConfig::STANDARD)
    }

    /// Parse and fully validate a frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is too short (< 5 bytes)
    /// - Start or end marker is wrong
    /// - Checksum verification fails
    /// - `LEN` disagrees with the buffer size
    /// - Opcode is unknown or its payload width is not in the table
    pub fn parse_with(bytes: &[u8], config: &ProtocolConfig) -> Result<Self> {
        check_envelope(bytes, config)?;

        let last = bytes.len() - 1;
        let expected = checksum::fold(&bytes[1..last - 1]);
        let received = bytes[last - 1];
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        let declared = bytes[1];
        let actual = bytes.len() - (FRAME_OVERHEAD - 1);
        if declared as usize != actual {
            return Err(Error::LengthMismatch { declared, actual });
        }

        let opcode = Opcode::try_from(bytes[2])?;

        Self::new(opcode, Bytes::copy_from_slice(&bytes[3..last - 1]))
    }
}

/// Encode a command as the value written to the shared attribute
///
/// This is the raw entry point: the caller guarantees the payload width
/// and big-endian byte order.
///
/// # Panics
///
/// Panics if `payload` does not have the width the command table
/// registers for `opcode`. That is a programming error.
///
/// ```
/// use motorlink_core::{frame, Opcode};
///
/// let value = frame::encode(Opcode::SetPosition, &[100]);
/// assert_eq!(&value[..], &[0x06, 0xAA, 0x02, 0x02, 0x64, 0x64, 0x55]);
/// ```
pub fn encode(opcode: Opcode, payload: &[u8]) -> BytesMut {
    assert!(
        opcode.spec().kind_for_width(payload.len()).is_some(),
        "{} takes a {}-byte payload, got {} bytes",
        opcode,
        opcode.payload_width(),
        payload.len()
    );

    Frame {
        opcode,
        payload: Bytes::copy_from_slice(payload),
    }
    .encode_value()
}

/// Remove the byte-count prefix from an attribute value
///
/// Returns `None` unless the prefix matches the number of bytes that follow.
pub fn strip_length_prefix(value: &[u8]) -> Option<&[u8]> {
    let (&count, rest) = value.split_first()?;
    (count as usize == rest.len()).then_some(rest)
}

/// Check size and markers
pub(crate) fn check_envelope(bytes: &[u8], config: &ProtocolConfig) -> Result<()> {
    if bytes.len() < MIN_FRAME_SIZE {
        return Err(Error::FrameTooShort {
            expected: MIN_FRAME_SIZE,
            actual: bytes.len(),
        });
    }

    if bytes[0] != config.start_marker {
        return Err(Error::InvalidStartMarker(bytes[0]));
    }

    let last = bytes[bytes.len() - 1];
    if last != config.end_marker {
        return Err(Error::InvalidEndMarker(last));
    }

    Ok(())
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("opcode", &self.opcode)
            .field("length", &self.length())
            .field("payload", &hex::encode(&self.payload))
            .field("checksum", &format!("0x{:02X}", self.checksum()))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](len={})", self.opcode, self.payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_frame_new() {
        let frame = Frame::new(Opcode::SetSpeed, vec![0x01, 0xF4]).unwrap();
        assert_eq!(frame.opcode, Opcode::SetSpeed);
        assert_eq!(frame.length(), 3);
        assert_eq!(frame.size(), 7);
    }

    #[test]
    fn test_frame_new_wrong_width() {
        let result = Frame::new(Opcode::Move, vec![0x01, 0x02]);
        assert_eq!(
            result,
            Err(Error::PayloadWidth {
                opcode: Opcode::Move,
                expected: 4,
                actual: 2,
            })
        );

        assert!(Frame::new(Opcode::Stop, vec![0x00]).is_err());
    }

    #[test]
    fn test_query_accepts_response_payload() {
        assert!(Frame::new(Opcode::GetPosition, Bytes::new()).is_ok());
        assert!(Frame::new(Opcode::GetPosition, vec![42]).is_ok());
        assert!(Frame::new(Opcode::GetSpeed, vec![0x01]).is_err());
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::empty(Opcode::GetCalibration);
        assert_eq!(&frame.encode()[..], &[0xAA, 0x01, 0x07, 0x06, 0x55]);
    }

    #[test]
    fn test_encode_value_prefix() {
        let value = Frame::empty(Opcode::Stop).encode_value();
        assert_eq!(&value[..], &[0x05, 0xAA, 0x01, 0x0C, 0x0D, 0x55]);
    }

    #[test]
    fn test_encode_move_negative() {
        let value = encode(Opcode::Move, &(-1600i32).to_be_bytes());
        // -1600 = 0xFFFFF9C0
        assert_eq!(
            &value[..],
            &[0x09, 0xAA, 0x05, 0x01, 0xFF, 0xFF, 0xF9, 0xC0, 0x3D, 0x55]
        );
    }

    #[test]
    #[should_panic(expected = "4-byte payload")]
    fn test_encode_wrong_width_panics() {
        encode(Opcode::Move, &[0x00]);
    }

    #[test]
    fn test_move_roundtrip_negative() {
        let value = encode(Opcode::Move, &(-1600i32).to_be_bytes());
        let frame = Frame::parse(strip_length_prefix(&value).unwrap()).unwrap();

        assert_eq!(frame.opcode, Opcode::Move);
        assert_eq!(frame.value(), PayloadValue::Int32(-1600));
    }

    #[test]
    fn test_move_extremes() {
        for steps in [i32::MIN, -1, 0, 1, i32::MAX] {
            let frame = Frame::new(Opcode::Move, steps.to_be_bytes().to_vec()).unwrap();
            let parsed = Frame::parse(&frame.encode()).unwrap();
            assert_eq!(parsed.value(), PayloadValue::Int32(steps));
        }
    }

    #[test]
    fn test_set_speed_boundaries() {
        for speed in [0u16, 500] {
            let value = encode(Opcode::SetSpeed, &speed.to_be_bytes());
            let frame = Frame::parse(strip_length_prefix(&value).unwrap()).unwrap();
            assert_eq!(frame.value(), PayloadValue::UInt16(speed));
        }
    }

    #[test]
    fn test_parse_too_short() {
        let result = Frame::parse(&[0xAA, 0x01, 0x55]);
        assert!(matches!(result, Err(Error::FrameTooShort { expected: 5, actual: 3 })));
    }

    #[test]
    fn test_parse_bad_markers() {
        assert_eq!(
            Frame::parse(&[0xAB, 0x01, 0x0C, 0x0D, 0x55]),
            Err(Error::InvalidStartMarker(0xAB))
        );
        assert_eq!(
            Frame::parse(&[0xAA, 0x01, 0x0C, 0x0D, 0x56]),
            Err(Error::InvalidEndMarker(0x56))
        );
    }

    #[test]
    fn test_parse_checksum_mismatch() {
        let mut bytes = Frame::empty(Opcode::Stop).encode();
        bytes[3] ^= 0xFF;

        assert_eq!(
            Frame::parse(&bytes),
            Err(Error::ChecksumMismatch {
                expected: 0x0D,
                received: 0xF2,
            })
        );
    }

    #[test]
    fn test_parse_length_mismatch() {
        // LEN says 2 but only the opcode is present; checksum is consistent
        let bytes = [0xAA, 0x02, 0x0C, 0x0E, 0x55];
        assert_eq!(
            Frame::parse(&bytes),
            Err(Error::LengthMismatch {
                declared: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_parse_unknown_opcode() {
        let bytes = [0xAA, 0x01, 0x09, 0x08, 0x55];
        assert_eq!(Frame::parse(&bytes), Err(Error::UnknownOpcode(0x09)));
    }

    #[test]
    fn test_strip_length_prefix() {
        assert_eq!(strip_length_prefix(&[0x02, 0xAA, 0x55]), Some(&[0xAA, 0x55][..]));
        assert_eq!(strip_length_prefix(&[0x03, 0xAA, 0x55]), None);
        assert_eq!(strip_length_prefix(&[]), None);
    }

    #[test]
    fn test_value_views() {
        let speed = Frame::new(Opcode::GetSpeed, vec![0x01, 0xF4]).unwrap();
        assert_eq!(speed.value(), PayloadValue::UInt16(500));

        let position = Frame::new(Opcode::SetPosition, vec![75]).unwrap();
        assert_eq!(position.value(), PayloadValue::UInt8(75));

        assert_eq!(Frame::empty(Opcode::Stop).value(), PayloadValue::Empty);
    }

    fn any_frame() -> impl Strategy<Value = Frame> {
        prop_oneof![
            any::<i32>().prop_map(|v| Frame::new(Opcode::Move, v.to_be_bytes().to_vec()).unwrap()),
            any::<u8>().prop_map(|v| Frame::new(Opcode::SetPosition, vec![v]).unwrap()),
            any::<u16>().prop_map(|v| Frame::new(Opcode::SetSpeed, v.to_be_bytes().to_vec()).unwrap()),
            any::<u8>().prop_map(|v| Frame::new(Opcode::GetPosition, vec![v]).unwrap()),
            any::<u16>().prop_map(|v| Frame::new(Opcode::GetSpeed, v.to_be_bytes().to_vec()).unwrap()),
            proptest::sample::select(Opcode::ALL.to_vec()).prop_map(Frame::empty)
                .prop_filter("empty payload only", |f| f.opcode.payload_width() == 0),
        ]
    }

    proptest! {
        #[test]
        fn prop_encode_parse_roundtrip(frame in any_frame()) {
            let parsed = Frame::parse(&frame.encode()).unwrap();
            prop_assert_eq!(parsed, frame);
        }

        #[test]
        fn prop_encoded_length_invariant(frame in any_frame()) {
            let bytes = frame.encode();
            prop_assert_eq!(bytes[1] as usize, 1 + frame.payload.len());
            prop_assert_eq!(bytes[bytes.len() - 2], checksum::fold(&bytes[1..bytes.len() - 2]));
        }

        #[test]
        fn prop_value_prefix_matches_frame_size(frame in any_frame()) {
            let value = frame.encode_value();
            prop_assert_eq!(value[0] as usize, frame.size());
            prop_assert!(strip_length_prefix(&value).is_some());
        }
    }
}
