//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] motorlink_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] motorlink_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] motorlink_types::Error),
    
    #[error("Motor not connected")]
    NotConnected,

    #[error("{field} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Unknown property: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        key: String,
        value: String,
    },

    #[error("Property is write-only: {0}")]
    WriteOnly(String),

    #[error("Property is read-only: {0}")]
    ReadOnly(String),
}
