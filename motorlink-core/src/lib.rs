//! # motorlink-core
//!
//! Frame codec for UART motor controllers reached through a Zigbee
//! multistate value.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/parsing
//! - Checksum calculation
//! - Command table
//! - Report decoding with printable fallback
//!
//! Everything here is synchronous and free of side effects, so it can be
//! driven from any runtime. The protocol carries no correlation id: with
//! more than one request outstanding, a report cannot be attributed to the
//! request that caused it. Serializing requests is up to the transport owner.

pub mod checksum;
pub mod command;
pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod escape;
pub mod frame;
pub mod request;

pub use command::{CommandSpec, Direction, Opcode, PayloadKind};
pub use config::{ProtocolConfig, Variant};
pub use decode::{decode, decode_with, Decoded, Response};
pub use error::{Error, Result};
pub use frame::{Frame, PayloadValue};
pub use request::Request;
