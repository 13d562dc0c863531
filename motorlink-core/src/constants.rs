//! Protocol constants

/// Start of frame
pub const STX: u8 = 0xAA;

/// End of frame
pub const ETX: u8 = 0x55;

/// Smallest possible frame: STX, LEN, CMD, CHECKSUM, ETX
pub const MIN_FRAME_SIZE: usize = 5;

/// Bytes around the payload: STX, LEN, CMD, CHECKSUM, ETX
pub const FRAME_OVERHEAD: usize = 5;

/// Largest payload any opcode carries
pub const MAX_PAYLOAD_SIZE: usize = 4;

/// Largest frame any opcode produces
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Where the shared value lives on the device endpoint.
///
/// These describe the attribute the transport writes to and receives
/// reports from; the codec itself never looks at them.
pub mod attribute {
    /// Cluster holding the shared value (genMultistateValue)
    pub const CLUSTER: u16 = 0x0014;

    /// Attribute id of the shared value (stateText)
    pub const ID: u16 = 14;

    /// Attribute data type (character string)
    pub const DATA_TYPE: u8 = 0x42;

    /// Endpoint the motor controller is bound to
    pub const ENDPOINT: u8 = 1;
}
