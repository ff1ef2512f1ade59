//! # Color Codec
//!
//! Hex ↔ RGB ↔ HSV conversions used by decorator styling and the color
//! picker. Hex strings are always stored normalized as lowercase `#rrggbb`.

use egui::Color32;

/// RGB triple in 0..=255 float space (not yet rounded).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// HSV triple. `h` in degrees [0, 360), `s` and `v` in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Parse a 3- or 6-digit hex color, with or without `#`.
///
/// Shorthand is expanded by doubling each digit. Returns `None` for anything
/// that does not end up as exactly six hex digits.
pub fn parse_hex(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

/// Normalize `input` to `#rrggbb`, or return `fallback` unchanged.
pub fn normalize_hex(input: &str, fallback: &str) -> String {
    parse_hex(input).unwrap_or_else(|| fallback.to_string())
}

pub fn hex_to_rgb(hex: &str) -> Rgb {
    rgb_from_normalized(&normalize_hex(hex, "#ffffff"))
}

/// Channels of an already-normalized `#rrggbb` string.
fn rgb_from_normalized(hex: &str) -> Rgb {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(255) as f32
    };
    Rgb {
        r: channel(1..3),
        g: channel(3..5),
        b: channel(5..7),
    }
}

/// Round and clamp each channel to 0..=255 and format as `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    let to_byte = |x: f32| x.round().clamp(0.0, 255.0) as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        to_byte(rgb.r),
        to_byte(rgb.g),
        to_byte(rgb.b)
    )
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = rgb.r / 255.0;
    let g = rgb.g / 255.0;
    let b = rgb.b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let s = if max == 0.0 { 0.0 } else { d / max };
    let mut h = 0.0;
    if d != 0.0 {
        h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h /= 6.0;
    }
    Hsv {
        h: (h * 360.0).rem_euclid(360.0),
        s,
        v: max,
    }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = hsv.h.rem_euclid(360.0);
    let s = hsv.s.clamp(0.0, 1.0);
    let v = hsv.v.clamp(0.0, 1.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb {
        r: (r1 + m) * 255.0,
        g: (g1 + m) * 255.0,
        b: (b1 + m) * 255.0,
    }
}

/// Decode a hex string for painting, falling back to `fallback` when malformed.
pub fn hex_to_color32(hex: &str, fallback: Color32) -> Color32 {
    match parse_hex(hex) {
        Some(valid) => rgb_to_color32(rgb_from_normalized(&valid)),
        None => fallback,
    }
}

pub fn rgb_to_color32(rgb: Rgb) -> Color32 {
    let to_byte = |x: f32| x.round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(to_byte(rgb.r), to_byte(rgb.g), to_byte(rgb.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_hex_variants() {
        assert_eq!(parse_hex("#ABC").as_deref(), Some("#aabbcc"));
        assert_eq!(parse_hex("abc").as_deref(), Some("#aabbcc"));
        assert_eq!(parse_hex("  #12aB9f ").as_deref(), Some("#12ab9f"));
        assert_eq!(parse_hex("12ab9f").as_deref(), Some("#12ab9f"));
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#ggghhh"), None);
        assert_eq!(parse_hex("##abc"), None);
    }

    #[test]
    fn test_normalize_hex_uses_fallback_exactly() {
        assert_eq!(normalize_hex("nope", "#666666"), "#666666");
        assert_eq!(normalize_hex("", "not even hex"), "not even hex");
    }

    #[test]
    fn test_rgb_to_hex_rounds_and_clamps() {
        let hex = rgb_to_hex(Rgb {
            r: 300.0,
            g: -4.0,
            b: 127.5,
        });
        assert_eq!(hex, "#ff0080");
    }

    #[test]
    fn test_hex_to_rgb_falls_back_to_white() {
        assert_eq!(
            hex_to_rgb("zzz"),
            Rgb {
                r: 255.0,
                g: 255.0,
                b: 255.0
            }
        );
        assert_eq!(
            hex_to_rgb("#102030"),
            Rgb {
                r: 16.0,
                g: 32.0,
                b: 48.0
            }
        );
    }

    #[test]
    fn test_primary_hues() {
        let red = rgb_to_hsv(hex_to_rgb("#ff0000"));
        assert_eq!((red.h, red.s, red.v), (0.0, 1.0, 1.0));
        let green = rgb_to_hsv(hex_to_rgb("#00ff00"));
        assert!((green.h - 120.0).abs() < 1e-3);
        let blue = rgb_to_hsv(hex_to_rgb("#0000ff"));
        assert!((blue.h - 240.0).abs() < 1e-3);
        assert_eq!(rgb_to_hex(hsv_to_rgb(Hsv { h: 360.0, s: 1.0, v: 1.0 })), "#ff0000");
    }

    #[test]
    fn test_color32_bridge() {
        assert_eq!(
            hex_to_color32("#abc", Color32::BLACK),
            Color32::from_rgb(0xaa, 0xbb, 0xcc)
        );
        assert_eq!(hex_to_color32("bad", Color32::RED), Color32::RED);
    }

    #[test]
    fn test_color32_bridge_decodes_parsed_hex_once() {
        assert_eq!(
            hex_to_color32("  #12aB9F ", Color32::BLACK),
            Color32::from_rgb(0x12, 0xab, 0x9f)
        );
        assert_eq!(
            hex_to_color32("FfF", Color32::BLACK),
            rgb_to_color32(hex_to_rgb("#ffffff"))
        );
    }

    fn hex_digits(len: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec(
            proptest::sample::select("0123456789abcdefABCDEF".chars().collect::<Vec<_>>()),
            len,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(
            digits in prop_oneof![hex_digits(3), hex_digits(6)],
            hash in any::<bool>(),
        ) {
            let input = if hash { format!("#{digits}") } else { digits };
            let once = normalize_hex(&input, "#000000");
            prop_assert_eq!(normalize_hex(&once, "#000000"), once.clone());
            prop_assert_eq!(once.len(), 7);
        }

        #[test]
        fn malformed_returns_fallback(input in "[^0-9a-fA-F#]{1,8}") {
            prop_assert_eq!(normalize_hex(&input, "#123456"), "#123456");
        }

        #[test]
        fn wrong_length_returns_fallback(
            digits in prop_oneof![hex_digits(1), hex_digits(2), hex_digits(4), hex_digits(5), hex_digits(7)],
        ) {
            prop_assert_eq!(normalize_hex(&digits, "#fallbk"), "#fallbk");
        }

        #[test]
        fn hsv_round_trips(h in 0.0f32..360.0, s in 0.1f32..=1.0, v in 0.1f32..=1.0) {
            let back = rgb_to_hsv(hsv_to_rgb(Hsv { h, s, v }));
            let dh = (back.h - h).abs();
            prop_assert!(dh < 5e-2 || (360.0 - dh) < 5e-2, "h {} -> {}", h, back.h);
            prop_assert!((back.s - s).abs() < 1e-3);
            prop_assert!((back.v - v).abs() < 1e-3);
        }
    }
}
