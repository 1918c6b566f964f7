//! Language-driver byte resolution.
//!
//! The byte at header offset 29 names the code page character fields were
//! written in. `resolve` maps the documented xBase language-driver IDs onto
//! numeric code pages; `encoding_for` maps those onto `encoding_rs`
//! encodings where one exists. The DOS OEM pages `encoding_rs` does not
//! ship (437, 850, 852, ...) stay unmapped and callers fall back to the
//! Latin-1 identity decoding in [`utils`](crate::dbf::utils).

use encoding_rs::{
    Encoding, BIG5, EUC_KR, GBK, IBM866, MACINTOSH, SHIFT_JIS, WINDOWS_1250, WINDOWS_1251,
    WINDOWS_1252, WINDOWS_1253, WINDOWS_1254, WINDOWS_1257, WINDOWS_874,
};

/// Map a language-driver byte to its numeric code page.
///
/// Unknown bytes (including 0x00, "no driver recorded") resolve to `None`.
pub fn resolve(language_driver: u8) -> Option<u16> {
    let code_page = match language_driver {
        0x01 | 0x09 | 0x0B | 0x0D | 0x0F | 0x11 | 0x15 | 0x18 | 0x19 | 0x1B => 437,
        0x02 | 0x0A | 0x0E | 0x10 | 0x12 | 0x14 | 0x16 | 0x1A | 0x1D | 0x25 | 0x37 => 850,
        0x1F | 0x22 | 0x23 | 0x40 | 0x64 | 0x87 => 852,
        0x6B | 0x88 => 857,
        0x24 => 860,
        0x67 => 861,
        0x1C | 0x6C => 863,
        0x08 | 0x17 | 0x66 => 865,
        0x26 | 0x65 => 866,
        0x6A | 0x86 => 737,
        0x50 | 0x7C => 874,
        0x13 | 0x7B => 932,
        0x4D | 0x7A => 936,
        0x4E | 0x79 => 949,
        0x4F | 0x78 => 950,
        0xC8 => 1250,
        0xC9 => 1251,
        0x03 | 0x57 | 0x58 | 0x59 => 1252,
        0xCB => 1253,
        0xCA => 1254,
        0xCC => 1257,
        0x04 => 10000,
        _ => return None,
    };
    Some(code_page)
}

/// The `encoding_rs` encoding for a numeric code page, where one exists.
pub fn encoding_for(code_page: u16) -> Option<&'static Encoding> {
    match code_page {
        866 => Some(IBM866),
        874 => Some(WINDOWS_874),
        932 => Some(SHIFT_JIS),
        936 => Some(GBK),
        949 => Some(EUC_KR),
        950 => Some(BIG5),
        1250 => Some(WINDOWS_1250),
        1251 => Some(WINDOWS_1251),
        1252 => Some(WINDOWS_1252),
        1253 => Some(WINDOWS_1253),
        1254 => Some(WINDOWS_1254),
        1257 => Some(WINDOWS_1257),
        10000 => Some(MACINTOSH),
        _ => None,
    }
}

/// Resolve a language-driver byte straight to an encoding.
pub fn encoding_for_driver(language_driver: u8) -> Option<&'static Encoding> {
    resolve(language_driver).and_then(encoding_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_drivers_resolve() {
        assert_eq!(resolve(0x03), Some(1252));
        assert_eq!(resolve(0x26), Some(866));
        assert_eq!(resolve(0x4F), Some(950));
        assert_eq!(resolve(0x04), Some(10000));
        assert_eq!(resolve(0x6A), Some(737));
        assert_eq!(resolve(0xC9), Some(1251));
    }

    #[test]
    fn unknown_drivers_resolve_to_none() {
        assert_eq!(resolve(0x00), None);
        assert_eq!(resolve(0x05), None);
        assert_eq!(resolve(0xFF), None);
    }

    #[test]
    fn windows_pages_map_to_encodings() {
        assert_eq!(encoding_for(1252), Some(WINDOWS_1252));
        assert_eq!(encoding_for(866), Some(IBM866));
        assert_eq!(encoding_for(950), Some(BIG5));
    }

    #[test]
    fn dos_oem_pages_fall_back_to_identity() {
        assert_eq!(encoding_for(437), None);
        assert_eq!(encoding_for(850), None);
        assert_eq!(encoding_for(852), None);
    }

    #[test]
    fn driver_to_encoding_shortcut() {
        assert_eq!(encoding_for_driver(0x26), Some(IBM866));
        assert_eq!(encoding_for_driver(0x01), None); // 437 has no encoding
        assert_eq!(encoding_for_driver(0x00), None);
    }
}
