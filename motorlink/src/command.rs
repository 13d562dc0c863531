//! Semantic motor commands
//!
//! Maps what a user asks for (open, move 400 steps, calibrate "closed")
//! onto protocol requests, and parses the key/value property surface the
//! home-automation side speaks.

use std::fmt;

use bytes::Bytes;
use motorlink_core::{escape, ProtocolConfig, Request};
use motorlink_types::{Calibration, CoverState, POSITION_MAX, POSITION_MIN, SPEED_MAX, SPEED_MIN};

use crate::error::{Error, Result};

/// Readable device properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Position,
    Calibration,
    Speed,
}

impl Query {
    pub fn request(self) -> Request {
        match self {
            Self::Position => Request::GetPosition,
            Self::Calibration => Request::GetCalibration,
            Self::Speed => Request::GetSpeed,
        }
    }

    /// Parse a property name from the get surface
    ///
    /// `state` is derived from the position, so reading it queries the
    /// position.
    pub fn from_property(key: &str) -> Result<Self> {
        match key {
            "position" | "state" => Ok(Self::Position),
            "calibrated" => Ok(Self::Calibration),
            "speed" => Ok(Self::Speed),
            "move" | "calibration" | "action" => Err(Error::WriteOnly(key.to_string())),
            other => Err(Error::UnknownKey(other.to_string())),
        }
    }
}

/// A command issued to the motor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotorCommand {
    Stop,
    /// Go to 100 %
    Open,
    /// Go to 0 %
    Close,
    /// Go to a position; values above 100 are clamped
    SetPosition(u8),
    /// Move by a signed number of steps
    Move(i32),
    /// Set speed in rpm (0–500)
    SetSpeed(u16),
    Calibrate(Calibration),
    /// Bytes written to the attribute as-is, without framing
    Raw(Bytes),
    Query(Query),
}

/// What a command puts on the attribute
enum Outbound<'a> {
    Request(Request),
    Raw(&'a Bytes),
}

impl MotorCommand {
    /// Map onto a protocol request
    ///
    /// Returns `Ok(None)` for raw pass-through, which has no request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for a speed above 500 rpm.
    pub fn to_request(&self) -> Result<Option<Request>> {
        Ok(match self.outbound()? {
            Outbound::Request(request) => Some(request),
            Outbound::Raw(_) => None,
        })
    }

    /// Encode as the value written to the shared attribute
    pub fn encode(&self, config: &ProtocolConfig) -> Result<Bytes> {
        match self.outbound()? {
            Outbound::Request(request) => Ok(request.encode(config)?.freeze()),
            Outbound::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    fn outbound(&self) -> Result<Outbound<'_>> {
        let request = match self {
            Self::Stop => Request::Stop,
            Self::Open => Request::SetPosition(POSITION_MAX),
            Self::Close => Request::SetPosition(POSITION_MIN),
            Self::SetPosition(position) => Request::SetPosition((*position).min(POSITION_MAX)),
            Self::Move(steps) => Request::Move(*steps),
            Self::SetSpeed(speed) => {
                if *speed > SPEED_MAX {
                    return Err(Error::OutOfRange {
                        field: "speed",
                        value: i64::from(*speed),
                        min: i64::from(SPEED_MIN),
                        max: i64::from(SPEED_MAX),
                    });
                }
                Request::SetSpeed(*speed)
            }
            Self::Calibrate(Calibration::Closed) => Request::SetMinLimit,
            Self::Calibrate(Calibration::Opened) => Request::SetMaxLimit,
            Self::Calibrate(Calibration::Reset) => Request::ResetCalibration,
            Self::Raw(bytes) => return Ok(Outbound::Raw(bytes)),
            Self::Query(query) => query.request(),
        };

        Ok(Outbound::Request(request))
    }

    /// Raw pass-through from escaped text, as rendered by the decoder
    pub fn raw_from_text(text: &str) -> Self {
        Self::Raw(Bytes::from(escape::unescape(text)))
    }

    /// Parse a key/value pair from the set surface
    ///
    /// ```
    /// use motorlink::MotorCommand;
    ///
    /// assert_eq!(MotorCommand::from_property("state", "OPEN").unwrap(), MotorCommand::Open);
    /// assert_eq!(MotorCommand::from_property("position", "250").unwrap(), MotorCommand::SetPosition(100));
    /// assert_eq!(MotorCommand::from_property("move", "-800").unwrap(), MotorCommand::Move(-800));
    /// ```
    pub fn from_property(key: &str, value: &str) -> Result<Self> {
        let raw = value;
        let value = value.trim();

        match key {
            "state" => Ok(match value.parse::<CoverState>()? {
                CoverState::Open => Self::Open,
                CoverState::Close => Self::Close,
                CoverState::Stop => Self::Stop,
            }),
            "position" => {
                let position = parse_integer(key, value)?;
                Ok(Self::SetPosition(position.clamp(i64::from(POSITION_MIN), i64::from(POSITION_MAX)) as u8))
            }
            "move" => {
                let steps = parse_integer(key, value)?;
                let steps = i32::try_from(steps).map_err(|_| Error::OutOfRange {
                    field: "move",
                    value: steps,
                    min: i64::from(i32::MIN),
                    max: i64::from(i32::MAX),
                })?;
                Ok(Self::Move(steps))
            }
            "speed" => {
                let speed = parse_integer(key, value)?;
                if !(i64::from(SPEED_MIN)..=i64::from(SPEED_MAX)).contains(&speed) {
                    return Err(Error::OutOfRange {
                        field: "speed",
                        value: speed,
                        min: i64::from(SPEED_MIN),
                        max: i64::from(SPEED_MAX),
                    });
                }
                Ok(Self::SetSpeed(speed as u16))
            }
            "calibration" => Ok(Self::Calibrate(value.parse()?)),
            // Not trimmed: leading and trailing spaces are sent to the UART
            "action" => Ok(Self::raw_from_text(raw)),
            "calibrated" => Err(Error::ReadOnly(key.to_string())),
            other => Err(Error::UnknownKey(other.to_string())),
        }
    }
}

fn parse_integer(key: &str, value: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|_| Error::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl From<Query> for MotorCommand {
    fn from(query: Query) -> Self {
        Self::Query(query)
    }
}

impl From<Calibration> for MotorCommand {
    fn from(calibration: Calibration) -> Self {
        Self::Calibrate(calibration)
    }
}

impl fmt::Display for MotorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => f.write_str("stop"),
            Self::Open => f.write_str("open"),
            Self::Close => f.write_str("close"),
            Self::SetPosition(position) => write!(f, "position {}%", position),
            Self::Move(steps) => write!(f, "move {} steps", steps),
            Self::SetSpeed(speed) => write!(f, "speed {} rpm", speed),
            Self::Calibrate(calibration) => write!(f, "calibrate {}", calibration),
            Self::Raw(bytes) => write!(f, "raw {}", escape::escape(bytes)),
            Self::Query(query) => write!(f, "query {:?}", query),
        }
    }
}
