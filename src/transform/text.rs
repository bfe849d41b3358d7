//! Text transformer
//!
//! Two independent concerns: literal text content, and a typography record.
//! Line height is normalized to an em ratio of the font size and letter
//! spacing to a percentage of the font size, so the output stays meaningful
//! when the consumer rescales type.

use crate::extract::model::SimplifiedTextStyle;
use crate::transform::colors::round2;
use crate::types::RawNode;

/// Literal text content, when present and non-empty
pub fn extract_node_text(node: &RawNode) -> Option<String> {
    node.characters
        .as_ref()
        .filter(|text| !text.is_empty())
        .cloned()
}

/// Typography record from the node's raw style block
///
/// Returns `None` when there is no style block or it carries no information.
pub fn extract_text_style(node: &RawNode) -> Option<SimplifiedTextStyle> {
    let style = node.style.as_ref()?;
    if style.is_empty() {
        return None;
    }

    let font_size = style.font_size;

    let line_height = match (style.line_height_px, font_size) {
        (Some(px), Some(size)) if size > 0.0 => Some(format!("{}em", round2(px / size))),
        _ => None,
    };

    let letter_spacing = match (style.letter_spacing, font_size) {
        (Some(spacing), Some(size)) if spacing != 0.0 && size > 0.0 => {
            Some(format!("{}%", round2(spacing / size * 100.0)))
        }
        _ => None,
    };

    let simplified = SimplifiedTextStyle {
        font_family: style.font_family.clone(),
        font_weight: style.font_weight,
        font_size,
        line_height,
        letter_spacing,
        text_case: style.text_case.clone(),
        text_align_horizontal: style.text_align_horizontal.clone(),
        text_align_vertical: style.text_align_vertical.clone(),
    };

    (!simplified.is_empty()).then_some(simplified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_content() {
        let raw = node(json!({
            "id": "1:1", "name": "Label", "type": "TEXT", "characters": "Sign in"
        }));
        assert_eq!(extract_node_text(&raw).as_deref(), Some("Sign in"));
    }

    #[test]
    fn test_empty_text_skipped() {
        let raw = node(json!({
            "id": "1:1", "name": "Label", "type": "TEXT", "characters": ""
        }));
        assert!(extract_node_text(&raw).is_none());
    }

    #[test]
    fn test_text_style_normalization() {
        let raw = node(json!({
            "id": "1:1", "name": "Label", "type": "TEXT",
            "style": {
                "fontFamily": "Inter",
                "fontWeight": 600,
                "fontSize": 16,
                "lineHeightPx": 24,
                "letterSpacing": 0.4,
                "textCase": "UPPER",
                "textAlignHorizontal": "CENTER"
            }
        }));
        let style = extract_text_style(&raw).unwrap();
        assert_eq!(style.font_family.as_deref(), Some("Inter"));
        assert_eq!(style.font_weight, Some(600.0));
        assert_eq!(style.line_height.as_deref(), Some("1.5em"));
        assert_eq!(style.letter_spacing.as_deref(), Some("2.5%"));
        assert_eq!(style.text_case.as_deref(), Some("UPPER"));
    }

    #[test]
    fn test_missing_style_block() {
        let raw = node(json!({ "id": "1:1", "name": "Label", "type": "TEXT" }));
        assert!(extract_text_style(&raw).is_none());
    }

    #[test]
    fn test_empty_style_block() {
        let raw = node(json!({
            "id": "1:1", "name": "Label", "type": "TEXT", "style": {}
        }));
        assert!(extract_text_style(&raw).is_none());
    }

    #[test]
    fn test_zero_letter_spacing_dropped() {
        let raw = node(json!({
            "id": "1:1", "name": "Label", "type": "TEXT",
            "style": { "fontSize": 14, "letterSpacing": 0 }
        }));
        let style = extract_text_style(&raw).unwrap();
        assert!(style.letter_spacing.is_none());
        assert_eq!(style.font_size, Some(14.0));
    }
}
