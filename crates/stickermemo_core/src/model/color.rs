//! Sticker color palette and contrast helper.
//!
//! # Responsibility
//! - Keep the canonical board palette in one place.
//! - Pick a readable text color for any memo background.

/// Background palette offered by the memo editor, in picker order.
pub const MEMO_COLORS: [&str; 9] = [
    "#FFE082", "#FFAB91", "#F8BBD9", "#CE93D8", "#90CAF9", "#A5D6A7", "#FFCDD2", "#D7CCC8",
    "#F5F5F5",
];

/// Default background for memos created without an explicit color.
pub fn default_color() -> &'static str {
    MEMO_COLORS[0]
}

/// Whether a color is one of the palette entries.
pub fn is_palette_color(color: &str) -> bool {
    MEMO_COLORS
        .iter()
        .any(|entry| entry.eq_ignore_ascii_case(color))
}

/// Chooses black or white text for a `#rrggbb` background.
///
/// Perceived luminance is `(0.299 r + 0.587 g + 0.114 b) / 255`; values
/// above 0.5 get black text. Malformed input falls back to black, the safe
/// choice on this pastel palette.
pub fn text_color_for_background(hex: &str) -> &'static str {
    match parse_rgb(hex) {
        Some((r, g, b)) => {
            let luminance =
                (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
            if luminance > 0.5 {
                "#000000"
            } else {
                "#FFFFFF"
            }
        }
        None => "#000000",
    }
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() < 6 || !digits.is_char_boundary(6) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
