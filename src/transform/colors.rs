//! Color and edge-value conversions
//!
//! Pure numeric helpers mapping the API's normalized RGBA model onto CSS
//! text: hex strings for opaque colors, `rgba()` for anything translucent,
//! plus the `px` shorthand used for paddings, radii and stroke weights.

use crate::types::Color;

/// A color converted to CSS, with its effective alpha kept alongside
#[derive(Debug, Clone, PartialEq)]
pub struct CssColor {
    pub css: String,
    pub alpha: f64,
}

/// Convert an RGBA color plus a paint-level opacity to CSS text
///
/// The effective alpha is `opacity * a`, rounded to two decimals. A fully
/// opaque color becomes a 6-digit uppercase hex string; anything else becomes
/// an `rgba(r, g, b, alpha)` string.
pub fn convert_color(color: &Color, opacity: f64) -> CssColor {
    let alpha = ((opacity * color.a) * 100.0).round() / 100.0;

    if (alpha - 1.0).abs() < f64::EPSILON {
        CssColor {
            css: format_hex(color),
            alpha: 1.0,
        }
    } else {
        CssColor {
            css: format_rgba(color, alpha),
            alpha,
        }
    }
}

/// Format a color as `#RRGGBB` (uppercase, alpha ignored)
pub fn format_hex(color: &Color) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b)
    )
}

/// Format a color as `rgba(r, g, b, alpha)` with byte channels
pub fn format_rgba(color: &Color, alpha: f64) -> String {
    format!(
        "rgba({}, {}, {}, {alpha})",
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b)
    )
}

/// Convert a float channel in 0.0-1.0 to a byte, clamping out-of-range input
fn channel_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Format a number followed by `px`, trimming a trailing `.0`
pub fn format_px(value: f64) -> String {
    format!("{}px", round2(value))
}

/// Round to two decimals (f64 Display then prints the shortest form)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build a CSS edge shorthand from four edge values
///
/// - all four equal: `"Npx"`
/// - vertically and horizontally symmetric: `"Vpx Hpx"`
/// - otherwise: `"Tpx Rpx Bpx Lpx"`
/// - all zero with `ignore_zero`: `None`
pub fn generate_css_shorthand(
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
    ignore_zero: bool,
) -> Option<String> {
    if ignore_zero && top == 0.0 && right == 0.0 && bottom == 0.0 && left == 0.0 {
        return None;
    }
    if top == right && right == bottom && bottom == left {
        return Some(format_px(top));
    }
    if top == bottom && right == left {
        return Some(format!("{} {}", format_px(top), format_px(right)));
    }
    Some(format!(
        "{} {} {} {}",
        format_px(top),
        format_px(right),
        format_px(bottom),
        format_px(left)
    ))
}
