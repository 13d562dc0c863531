//! Printable rendering of raw device output
//!
//! Devices report free-form UART text through the same attribute as
//! protocol frames. Anything that is not a recognised frame is rendered
//! with non-printable bytes escaped as `\xHH`.

use std::fmt::Write;

/// Render bytes as text, escaping everything outside 32..=127
///
/// # Examples
///
/// ```
/// use motorlink_core::escape;
///
/// assert_eq!(escape::escape(&[0x41, 0x01, 0xFF]), "A\\x01\\xff");
/// ```
pub fn escape(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());

    for &byte in bytes {
        if (32..=127).contains(&byte) {
            text.push(byte as char);
        } else {
            // Writing to a String cannot fail
            let _ = write!(text, "\\x{:02x}", byte);
        }
    }

    text
}

/// Parse escaped text back into raw bytes
///
/// `\xHH` (either case) becomes a single byte; every other character is
/// emitted as its UTF-8 encoding. A backslash that does not start a valid
/// escape is kept literally.
///
/// # Examples
///
/// ```
/// use motorlink_core::escape;
///
/// assert_eq!(escape::unescape("\\xaa\\x01\\x0c\\x0dU"), vec![0xAA, 0x01, 0x0C, 0x0D, 0x55]);
/// ```
pub fn unescape(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') {
            if let Some(value) = bytes.get(i + 2..i + 4).and_then(parse_hex_pair) {
                out.push(value);
                i += 4;
                continue;
            }
        }

        out.push(bytes[i]);
        i += 1;
    }

    out
}

fn parse_hex_pair(pair: &[u8]) -> Option<u8> {
    let hi = (pair[0] as char).to_digit(16)?;
    let lo = (pair[1] as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_escape_mixed() {
        assert_eq!(escape(&[0x41, 0x01, 0xFF]), "A\\x01\\xff");
    }

    #[test]
    fn test_escape_boundaries() {
        assert_eq!(escape(&[31]), "\\x1f");
        assert_eq!(escape(&[32]), " ");
        assert_eq!(escape(&[127]), "\x7f");
        assert_eq!(escape(&[128]), "\\x80");
        assert_eq!(escape(&[]), "");
    }

    #[test]
    fn test_escape_frame() {
        // STOP frame as it would appear on the attribute
        assert_eq!(
            escape(&[0xAA, 0x01, 0x0C, 0x0D, 0x55]),
            "\\xaa\\x01\\x0c\\x0dU"
        );
    }

    #[test]
    fn test_unescape_uppercase_hex() {
        assert_eq!(unescape("\\xAA\\x55"), vec![0xAA, 0x55]);
    }

    #[test]
    fn test_unescape_malformed_kept_literally() {
        assert_eq!(unescape("\\x"), b"\\x".to_vec());
        assert_eq!(unescape("\\xg1"), b"\\xg1".to_vec());
        assert_eq!(unescape("a\\b"), b"a\\b".to_vec());
        assert_eq!(unescape("\\x4"), b"\\x4".to_vec());
    }

    #[test]
    fn test_unescape_plain_text() {
        assert_eq!(unescape("hello"), b"hello".to_vec());
    }

    #[test]
    fn test_unescape_reverses_escape() {
        let raw = [0xAA, 0x02, 0x05, 0x00, 0x07, 0x55];
        assert_eq!(unescape(&escape(&raw)), raw.to_vec());
    }

    proptest! {
        #[test]
        fn prop_escape_output_is_ascii(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let text = escape(&bytes);
            prop_assert!(text.is_ascii());
        }

        // Without backslashes in the input the rendering is lossless
        #[test]
        fn prop_unescape_escape(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let bytes: Vec<u8> = bytes.into_iter().filter(|&b| b != b'\\').collect();
            prop_assert_eq!(unescape(&escape(&bytes)), bytes);
        }
    }
}
