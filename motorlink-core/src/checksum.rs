//! Frame checksum
//!
//! The checksum is a plain XOR fold over every byte between the start
//! marker and the checksum byte: `LEN ^ CMD ^ PAYLOAD[0] ^ ... ^ PAYLOAD[n-1]`.
//! It catches any single corrupted byte and any odd number of flipped bits
//! in the same bit position. It is not an integrity guarantee.

use tracing::trace;

/// Fold a byte sequence into its XOR checksum
///
/// # Examples
///
/// ```
/// use motorlink_core::checksum;
///
/// assert_eq!(checksum::fold(&[]), 0);
/// assert_eq!(checksum::fold(&[0x01, 0x0C]), 0x0D);
/// ```
pub fn fold(bytes: &[u8]) -> u8 {
    let checksum = bytes.iter().fold(0u8, |acc, &byte| acc ^ byte);

    trace!(
        len = bytes.len(),
        checksum = format!("0x{:02X}", checksum),
        "Calculated checksum"
    );

    checksum
}
