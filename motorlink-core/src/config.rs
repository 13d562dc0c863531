//! Protocol configuration
//!
//! The protocol is fixed, so the configuration is a plain immutable value.
//! Use [`ProtocolConfig::STANDARD`] unless talking to early firmware.

use std::fmt;

use crate::command::Opcode;
use crate::constants::{ETX, STX};

/// Command set spoken by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Complete command table, including speed control and stop
    #[default]
    Full,

    /// Early firmware: motion, limits and calibration only (0x01..=0x07)
    Compat,
}

impl Variant {
    /// Check if this command set contains `opcode`
    pub fn supports(self, opcode: Opcode) -> bool {
        match self {
            Self::Full => true,
            Self::Compat => matches!(
                opcode,
                Opcode::Move
                    | Opcode::SetPosition
                    | Opcode::SetMinLimit
                    | Opcode::SetMaxLimit
                    | Opcode::GetPosition
                    | Opcode::ResetCalibration
                    | Opcode::GetCalibration
            ),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Compat => f.write_str("compat"),
        }
    }
}

/// Framing and command-set parameters shared by encoder and decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolConfig {
    pub start_marker: u8,
    pub end_marker: u8,
    pub variant: Variant,
}

impl ProtocolConfig {
    /// Reference protocol: 0xAA/0x55 markers, full command table
    pub const STANDARD: ProtocolConfig = ProtocolConfig::new(Variant::Full);

    /// Same framing, early-firmware command subset
    pub const COMPAT: ProtocolConfig = ProtocolConfig::new(Variant::Compat);

    pub const fn new(variant: Variant) -> Self {
        Self {
            start_marker: STX,
            end_marker: ETX,
            variant,
        }
    }

    /// Check if `opcode` may be sent or dispatched under this configuration
    pub fn supports(&self, opcode: Opcode) -> bool {
        self.variant.supports(opcode)
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}
