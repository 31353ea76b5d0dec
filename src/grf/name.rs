use std::{fmt::Write as _, path::MAIN_SEPARATOR_STR};

use encoding_rs::{Encoding, EUC_KR, SHIFT_JIS};

/// Codecs tried in order when decoding a filename component.
///
/// Archives were authored on Korean-locale Windows and mix several legacy
/// encodings within one file list. encoding_rs's EUC-KR decoder is the
/// windows-949 superset, so it also covers names stored as UHC; Shift_JIS
/// picks up the occasional Japanese name.
const ENCODINGS: [&Encoding; 2] = [EUC_KR, SHIFT_JIS];

/// Decodes a full archive path into a logical filename.
///
/// The path is split on the `\` separator, a leading `data` component is
/// stripped, and the remaining components are decoded independently and
/// re-joined with the host separator.
pub(crate) fn decode_path(raw: &[u8]) -> String {
    let mut components = raw.split(|&byte| byte == b'\\').peekable();
    if components.peek() == Some(&&b"data"[..]) {
        components.next();
    }

    components
        .map(decode_component)
        .collect::<Vec<_>>()
        .join(MAIN_SEPARATOR_STR)
}

/// Decodes a single path component, never failing: if no codec accepts the
/// bytes, non-ASCII bytes degrade to two-digit hex escapes.
fn decode_component(raw: &[u8]) -> String {
    for encoding in ENCODINGS {
        if let Some(decoded) = encoding.decode_without_bom_handling_and_without_replacement(raw) {
            return decoded.into_owned();
        }
    }

    let mut escaped = String::with_capacity(raw.len());
    for &byte in raw {
        if byte.is_ascii() {
            escaped.push(byte as char);
        } else {
            let _ = write!(escaped, "{byte:02x}");
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_ascii() {
        assert_eq!(decode_path(b"a.txt"), "a.txt");
    }

    #[test]
    fn test_decode_strips_data_prefix() {
        let expected = ["texture", "a.bmp"].join(MAIN_SEPARATOR_STR);
        assert_eq!(decode_path(b"data\\texture\\a.bmp"), expected);
    }

    #[test]
    fn test_decode_keeps_other_prefixes() {
        let expected = ["sound", "a.wav"].join(MAIN_SEPARATOR_STR);
        assert_eq!(decode_path(b"sound\\a.wav"), expected);
    }

    #[test]
    fn test_decode_euc_kr() {
        // 0xB0A1 is the syllable GA.
        assert_eq!(decode_component(&[0xB0, 0xA1]), "\u{AC00}");
    }

    #[test]
    fn test_decode_shift_jis_fallback() {
        // A lone 0xB1 is invalid EUC-KR but a half-width katakana in
        // Shift_JIS.
        assert_eq!(decode_component(&[0xB1]), "\u{FF71}");
    }

    #[test]
    fn test_decode_hex_escape_fallback() {
        assert_eq!(decode_component(&[0xFF, 0xFF]), "ffff");
        assert_eq!(decode_component(b"a\xFFb"), "affb");
    }

    #[test]
    fn test_decode_never_fails() {
        for byte in 0..=255u8 {
            let _ = decode_path(&[byte]);
        }
    }
}
