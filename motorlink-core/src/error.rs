//! Error types for motorlink-core

use crate::command::Opcode;
use crate::config::Variant;

/// Result type alias for motorlink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// First byte is not the start marker
    #[error("Invalid start marker: 0x{0:02X}")]
    InvalidStartMarker(u8),

    /// Last byte is not the end marker
    #[error("Invalid end marker: 0x{0:02X}")]
    InvalidEndMarker(u8),

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },

    /// Length byte disagrees with the bytes actually present
    #[error("Length mismatch: header declares {declared}, frame carries {actual}")]
    LengthMismatch {
        declared: u8,
        actual: usize,
    },

    /// Unknown opcode byte
    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// Payload width does not match the command table
    #[error("Invalid payload for {opcode}: expected {expected} bytes, got {actual} bytes")]
    PayloadWidth {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },

    /// Opcode exists but is not part of the configured variant
    #[error("{opcode} is not supported by the {variant} command set")]
    UnsupportedOpcode {
        opcode: Opcode,
        variant: Variant,
    },
}

impl Error {
    /// Check if the input was not a frame at all (too short or bad markers)
    pub fn is_envelope_error(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. } | Self::InvalidStartMarker(_) | Self::InvalidEndMarker(_)
        )
    }
}
