//! Type definitions for motorlink

pub mod calibration;
pub mod error;
pub mod state;

pub use calibration::Calibration;
pub use error::{Error, Result};
pub use state::{CoverState, MotorState, StateUpdate};

/// Lowest reportable position (fully closed)
pub const POSITION_MIN: u8 = 0;

/// Highest reportable position (fully open)
pub const POSITION_MAX: u8 = 100;

/// Lowest motor speed (rpm)
pub const SPEED_MIN: u16 = 0;

/// Highest motor speed (rpm)
pub const SPEED_MAX: u16 = 500;

/// Step counts offered as presets for the `move` property
pub const MOVE_PRESETS: [i32; 7] = [-1600, -800, -400, 100, 400, 800, 1600];
