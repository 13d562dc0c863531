//! Calibration actions

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Calibration action written through the `calibration` property
///
/// Calibration is write-only: the controller never reports which limit
/// was last taught, only whether the motor is calibrated at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calibration {
    /// Store the current position as the closed (minimum) limit
    Closed,

    /// Store the current position as the opened (maximum) limit
    Opened,

    /// Forget both limits
    Reset,
}

impl Calibration {
    /// All calibration actions, in the order the integration layer lists them
    pub const ALL: [Calibration; 3] = [Self::Closed, Self::Opened, Self::Reset];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opened => "opened",
            Self::Reset => "reset",
        }
    }
}

impl FromStr for Calibration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(Self::Closed),
            "opened" => Ok(Self::Opened),
            "reset" => Ok(Self::Reset),
            other => Err(Error::UnknownCalibration(other.to_string())),
        }
    }
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
