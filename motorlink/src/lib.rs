//! # motorlink
//!
//! Driver for UART motor controllers that tunnel their protocol through
//! a single Zigbee multistate attribute.
//!
//! ## Features
//!
//! - Type-safe frame codec with checksum validation
//! - Async/await API using Tokio
//! - Key/value property surface for home-automation bridges
//! - Simulated controller for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use motorlink::Motor;
//!
//! #[tokio::main]
//! async fn main() -> motorlink::Result<()> {
//!     // Connect through a coordinator bridge
//!     let mut motor = Motor::udp("192.168.1.50", 4371);
//!     motor.connect().await?;
//!     
//!     // Open the cover, then ask where it is
//!     motor.open().await?;
//!     motor.get("position").await?;
//!     motor.poll().await?;
//!     println!("{}", motor.state());
//!     
//!     // Disconnect
//!     motor.disconnect().await?;
//!     
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod error;
pub mod motor;
pub mod sim;

// Re-exports
pub use command::{MotorCommand, Query};
pub use error::{Error, Result};
pub use motor::Motor;
pub use sim::SimulatedMotor;

// Re-export types
pub use motorlink_core::{decode, Decoded, Frame, Opcode, ProtocolConfig, Request, Response, Variant};
pub use motorlink_types::{Calibration, CoverState, MotorState, StateUpdate};
