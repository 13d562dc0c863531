//! Semantic motor state

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::Error;

/// Logical cover state
///
/// `Open` and `Close` are derived from reported positions; `Stop` is only
/// ever written by the controller side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverState {
    Open,
    Close,
    Stop,
}

impl CoverState {
    /// Derive the logical state from a reported position byte
    ///
    /// Position 0 is closed; anything else counts as open.
    pub fn from_position(position: u8) -> Self {
        if position == 0 {
            Self::Close
        } else {
            Self::Open
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::Stop => "STOP",
        }
    }
}

impl FromStr for CoverState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "CLOSE" => Ok(Self::Close),
            "STOP" => Ok(Self::Stop),
            other => Err(Error::UnknownCoverState(other.to_string())),
        }
    }
}

impl fmt::Display for CoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields carried by a single device report
///
/// Only the fields present in the report are `Some`; everything else is
/// left untouched when the update is applied to a [`MotorState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub position: Option<u8>,
    pub state: Option<CoverState>,
    pub calibrated: Option<bool>,
    pub speed: Option<u16>,
    pub action: Option<String>,
}

impl StateUpdate {
    /// Update for a position report (also derives the cover state)
    pub fn position(position: u8) -> Self {
        Self {
            position: Some(position),
            state: Some(CoverState::from_position(position)),
            ..Default::default()
        }
    }

    pub fn calibrated(calibrated: bool) -> Self {
        Self {
            calibrated: Some(calibrated),
            ..Default::default()
        }
    }

    pub fn speed(speed: u16) -> Self {
        Self {
            speed: Some(speed),
            ..Default::default()
        }
    }

    pub fn action(text: impl Into<String>) -> Self {
        Self {
            action: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.state.is_none()
            && self.calibrated.is_none()
            && self.speed.is_none()
            && self.action.is_none()
    }
}

/// Last known state of a motor, as projected from device reports
///
/// Every field starts out unknown and is overwritten field by field as
/// reports arrive. There is no other way to mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotorState {
    /// Position in percent (0 = closed, 100 = open)
    pub position: Option<u8>,

    /// Logical state derived from the last position report
    pub state: Option<CoverState>,

    /// Whether both limits have been taught
    pub calibrated: Option<bool>,

    /// Motor speed in rpm
    pub speed_rpm: Option<u16>,

    /// Last free-form text reported by the device
    pub last_action: Option<String>,

    /// When the last non-empty update was applied
    pub updated_at: Option<DateTime<Utc>>,
}

impl MotorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a report, overwriting only the fields it carries
    ///
    /// Returns `false` (and leaves the timestamp alone) for an empty update.
    pub fn apply(&mut self, update: &StateUpdate) -> bool {
        if update.is_empty() {
            return false;
        }

        if let Some(position) = update.position {
            self.position = Some(position);
        }
        if let Some(state) = update.state {
            self.state = Some(state);
        }
        if let Some(calibrated) = update.calibrated {
            self.calibrated = Some(calibrated);
        }
        if let Some(speed) = update.speed {
            self.speed_rpm = Some(speed);
        }
        if let Some(action) = &update.action {
            self.last_action = Some(action.clone());
        }

        self.updated_at = Some(Utc::now());
        true
    }
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".to_string())
        }

        write!(
            f,
            "Motor[state: {}, position: {}%, calibrated: {}, speed: {} rpm]",
            field(&self.state),
            field(&self.position),
            field(&self.calibrated),
            field(&self.speed_rpm)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_state_from_position() {
        assert_eq!(CoverState::from_position(0), CoverState::Close);
        assert_eq!(CoverState::from_position(1), CoverState::Open);
        assert_eq!(CoverState::from_position(100), CoverState::Open);
        assert_eq!(CoverState::from_position(255), CoverState::Open);
    }

    #[test]
    fn test_cover_state_parse() {
        assert_eq!("OPEN".parse::<CoverState>().unwrap(), CoverState::Open);
        assert_eq!("CLOSE".parse::<CoverState>().unwrap(), CoverState::Close);
        assert_eq!("STOP".parse::<CoverState>().unwrap(), CoverState::Stop);
        assert!("open".parse::<CoverState>().is_err());
        assert_eq!(
            "HALF".parse::<CoverState>(),
            Err(Error::UnknownCoverState("HALF".to_string()))
        );
    }

    #[test]
    fn test_apply_overwrites_only_present_fields() {
        let mut state = MotorState::new();
        assert!(state.apply(&StateUpdate::speed(250)));
        assert!(state.apply(&StateUpdate::position(40)));

        assert_eq!(state.speed_rpm, Some(250));
        assert_eq!(state.position, Some(40));
        assert_eq!(state.state, Some(CoverState::Open));
        assert_eq!(state.calibrated, None);

        assert!(state.apply(&StateUpdate::position(0)));
        assert_eq!(state.state, Some(CoverState::Close));
        assert_eq!(state.speed_rpm, Some(250));
    }

    #[test]
    fn test_apply_empty_update() {
        let mut state = MotorState::new();
        assert!(!state.apply(&StateUpdate::default()));
        assert!(state.updated_at.is_none());
    }

    #[test]
    fn test_apply_records_action_text() {
        let mut state = MotorState::new();
        state.apply(&StateUpdate::action("boot ok"));
        assert_eq!(state.last_action.as_deref(), Some("boot ok"));
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn test_display_unknown_fields() {
        let state = MotorState::new();
        assert_eq!(
            state.to_string(),
            "Motor[state: ?, position: ?%, calibrated: ?, speed: ? rpm]"
        );
    }
}
