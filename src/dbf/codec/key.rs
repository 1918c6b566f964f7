//! Normalization of user-supplied key material into the 8-byte SX key.

/// Length of an SX cipher key in bytes.
pub const SX_KEY_LEN: usize = 8;

/// The 8-byte key vector consumed by the SX cipher.
///
/// Any input maps to some key: text is encoded as UTF-8 and truncated to 8
/// bytes, byte slices are cut at index 7, and short inputs are zero-padded.
/// There is no failure mode, including the all-zero key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SxKey([u8; SX_KEY_LEN]);

impl SxKey {
    /// Build a key from arbitrary bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut key = [0u8; SX_KEY_LEN];
        let take = bytes.len().min(SX_KEY_LEN);
        key[..take].copy_from_slice(&bytes[..take]);
        Self(key)
    }

    /// Build a key from text, using its UTF-8 encoding.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; SX_KEY_LEN] {
        &self.0
    }
}

impl From<&str> for SxKey {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<&[u8]> for SxKey {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<[u8; SX_KEY_LEN]> for SxKey {
    fn from(key: [u8; SX_KEY_LEN]) -> Self {
        Self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_zero_padded() {
        let key = SxKey::from_text("abc");
        assert_eq!(key.as_bytes(), &[b'a', b'b', b'c', 0, 0, 0, 0, 0]);
    }

    #[test]
    fn long_text_is_truncated() {
        let key = SxKey::from_text("0123456789");
        assert_eq!(key.as_bytes(), b"01234567");
    }

    #[test]
    fn multibyte_text_truncates_mid_codepoint() {
        // UTF-8 of the key is cut at the byte level, not the char level.
        let key = SxKey::from_text("\u{b0}\u{266b}{\u{2554}\u{2195}V<\u{2193}");
        assert_eq!(
            key.as_bytes(),
            &[0xC2, 0xB0, 0xE2, 0x99, 0xAB, 0x7B, 0xE2, 0x95]
        );
    }

    #[test]
    fn byte_input_past_index_seven_is_dropped() {
        let key = SxKey::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(key.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn empty_input_yields_zero_key() {
        assert_eq!(SxKey::from_bytes(&[]).as_bytes(), &[0u8; 8]);
        assert_eq!(SxKey::from_text("").as_bytes(), &[0u8; 8]);
    }
}
