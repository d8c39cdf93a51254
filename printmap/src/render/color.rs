//! Owner colour parsing.

use tiny_skia::ColorU8;

/// Alpha applied to every territory fill.
pub const FILL_ALPHA: u8 = 110;

/// Fill used when a territory has no usable owner colour.
pub const FALLBACK_FILL: ColorU8 = ColorU8::from_rgba(120, 120, 220, FILL_ALPHA);

/// Parses an owner colour of the form `#RRGGBB` or `RRGGBB`.
///
/// Hex digits are case-insensitive; surrounding whitespace is not accepted.
/// The returned colour always carries [`FILL_ALPHA`].
pub fn parse_owner_color(hex: &str) -> Option<ColorU8> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(ColorU8::from_rgba(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        FILL_ALPHA,
    ))
}

/// Resolves the fill for an optional owner colour, falling back to
/// [`FALLBACK_FILL`].
pub fn fill_color(owner_color: Option<&str>) -> ColorU8 {
    owner_color
        .and_then(parse_owner_color)
        .unwrap_or(FALLBACK_FILL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_hash() {
        assert_eq!(
            parse_owner_color("#1A2B3C"),
            Some(ColorU8::from_rgba(26, 43, 60, 110))
        );
    }

    #[test]
    fn test_parse_without_hash_lowercase() {
        assert_eq!(
            parse_owner_color("1a2b3c"),
            Some(ColorU8::from_rgba(26, 43, 60, 110))
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(parse_owner_color("blue"), None);
        assert_eq!(parse_owner_color("#12345"), None);
        assert_eq!(parse_owner_color("#1234567"), None);
        assert_eq!(parse_owner_color("##123456"), None);
        assert_eq!(parse_owner_color(" #123456"), None);
        assert_eq!(parse_owner_color("#12G456"), None);
        assert_eq!(parse_owner_color(""), None);
        // Multi-byte input of the right byte length must not panic
        assert_eq!(parse_owner_color("ééé"), None);
    }

    #[test]
    fn test_fill_color_fallback() {
        assert_eq!(fill_color(Some("blue")), FALLBACK_FILL);
        assert_eq!(fill_color(None), ColorU8::from_rgba(120, 120, 220, 110));
        assert_eq!(
            fill_color(Some("#FF0000")),
            ColorU8::from_rgba(255, 0, 0, 110)
        );
    }
}
