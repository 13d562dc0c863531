pub type Result<T> = std::result::Result<T, Error>;

/// Error parsing a property value into a motor type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unknown cover state '{0}' (expected OPEN, CLOSE or STOP)")]
    UnknownCoverState(String),

    #[error("Unknown calibration action '{0}' (expected closed, opened or reset)")]
    UnknownCalibration(String),
}
