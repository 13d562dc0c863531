//! Motor controller command table

use std::fmt;

use bitflags::bitflags;

use crate::error::{Error, Result};

bitflags! {
    /// Which side of the link may send an opcode
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        /// Controller to device
        const REQUEST = 0b01;
        /// Device to controller
        const RESPONSE = 0b10;
    }
}

/// Semantic type of an opcode's payload
///
/// Multi-byte integers are big-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// No payload
    Empty,
    /// Single unsigned byte (position, status flag)
    UInt8,
    /// Unsigned 16-bit count (speed)
    UInt16Be,
    /// Signed 32-bit count (steps), two's complement
    Int32Be,
}

impl PayloadKind {
    /// Payload width in bytes
    pub const fn width(self) -> usize {
        match self {
            Self::Empty => 0,
            Self::UInt8 => 1,
            Self::UInt16Be => 2,
            Self::Int32Be => 4,
        }
    }
}

/// Static description of one opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub direction: Direction,
    /// Payload carried when the controller sends this opcode
    pub request: PayloadKind,
    /// Payload carried when the device reports this opcode
    pub response: PayloadKind,
}

impl CommandSpec {
    const fn request(kind: PayloadKind) -> Self {
        Self {
            direction: Direction::REQUEST,
            request: kind,
            response: PayloadKind::Empty,
        }
    }

    const fn query(response: PayloadKind) -> Self {
        Self {
            direction: Direction::REQUEST.union(Direction::RESPONSE),
            request: PayloadKind::Empty,
            response,
        }
    }

    /// Payload kind for a frame of `len` payload bytes, if the table allows one
    pub fn kind_for_width(&self, len: usize) -> Option<PayloadKind> {
        if self.direction.contains(Direction::REQUEST) && self.request.width() == len {
            Some(self.request)
        } else if self.direction.contains(Direction::RESPONSE) && self.response.width() == len {
            Some(self.response)
        } else {
            None
        }
    }
}

/// Protocol opcodes
///
/// All opcodes understood by the motor controller firmware.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    // Motion
    Move = 0x01,
    SetPosition = 0x02,

    // Calibration
    SetMinLimit = 0x03,
    SetMaxLimit = 0x04,
    GetPosition = 0x05,
    ResetCalibration = 0x06,
    GetCalibration = 0x07,

    // Speed
    SetSpeed = 0x0A,
    GetSpeed = 0x0B,

    Stop = 0x0C,
}

impl Opcode {
    /// Every opcode, in wire order
    pub const ALL: [Opcode; 10] = [
        Self::Move,
        Self::SetPosition,
        Self::SetMinLimit,
        Self::SetMaxLimit,
        Self::GetPosition,
        Self::ResetCalibration,
        Self::GetCalibration,
        Self::SetSpeed,
        Self::GetSpeed,
        Self::Stop,
    ];

    /// Look up this opcode in the command table
    pub const fn spec(self) -> CommandSpec {
        match self {
            Self::Move => CommandSpec::request(PayloadKind::Int32Be),
            Self::SetPosition => CommandSpec::request(PayloadKind::UInt8),
            Self::SetMinLimit => CommandSpec::request(PayloadKind::Empty),
            Self::SetMaxLimit => CommandSpec::request(PayloadKind::Empty),
            Self::GetPosition => CommandSpec::query(PayloadKind::UInt8),
            Self::ResetCalibration => CommandSpec::request(PayloadKind::Empty),
            Self::GetCalibration => CommandSpec::query(PayloadKind::UInt8),
            Self::SetSpeed => CommandSpec::request(PayloadKind::UInt16Be),
            Self::GetSpeed => CommandSpec::query(PayloadKind::UInt16Be),
            Self::Stop => CommandSpec::request(PayloadKind::Empty),
        }
    }

    /// Payload width when sent by the controller
    pub const fn payload_width(self) -> usize {
        self.spec().request.width()
    }

    /// Check if the device answers this opcode with a structured report
    pub fn is_query(self) -> bool {
        self.spec().direction.contains(Direction::RESPONSE)
    }

    /// Get opcode name
    pub fn name(self) -> &'static str {
        match self {
            Self::Move => "CMD_MOVE",
            Self::SetPosition => "CMD_SET_POS",
            Self::SetMinLimit => "CMD_SET_MIN",
            Self::SetMaxLimit => "CMD_SET_MAX",
            Self::GetPosition => "CMD_GET_POS",
            Self::ResetCalibration => "CMD_RESET_CAL",
            Self::GetCalibration => "CMD_GET_CAL",
            Self::SetSpeed => "CMD_SET_SPEED",
            Self::GetSpeed => "CMD_GET_SPEED",
            Self::Stop => "CMD_STOP",
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        opcode as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Move),
            0x02 => Ok(Self::SetPosition),
            0x03 => Ok(Self::SetMinLimit),
            0x04 => Ok(Self::SetMaxLimit),
            0x05 => Ok(Self::GetPosition),
            0x06 => Ok(Self::ResetCalibration),
            0x07 => Ok(Self::GetCalibration),
            0x0A => Ok(Self::SetSpeed),
            0x0B => Ok(Self::GetSpeed),
            0x0C => Ok(Self::Stop),
            _ => Err(Error::UnknownOpcode(value)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
