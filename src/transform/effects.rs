//! Effects transformer
//!
//! Shadows collapse into one comma-joined `box-shadow` value; layer blur and
//! background blur become `filter`/`backdrop-filter` strings.

use crate::extract::model::SimplifiedEffects;
use crate::transform::colors::{convert_color, format_px};
use crate::types::{Effect, RawNode};

/// Aggregate a node's visible effects into CSS-shaped strings
pub fn build_simplified_effects(node: &RawNode) -> SimplifiedEffects {
    let mut simplified = SimplifiedEffects::default();
    let Some(effects) = &node.effects else {
        return simplified;
    };

    let mut shadows = Vec::new();
    for effect in effects.iter().filter(|effect| effect.is_visible()) {
        match effect.effect_type.as_str() {
            "DROP_SHADOW" => {
                if let Some(shadow) = format_shadow(effect, false) {
                    shadows.push(shadow);
                }
            }
            "INNER_SHADOW" => {
                if let Some(shadow) = format_shadow(effect, true) {
                    shadows.push(shadow);
                }
            }
            "LAYER_BLUR" => {
                if let Some(radius) = effect.radius.filter(|radius| *radius > 0.0) {
                    simplified.filter = Some(format!("blur({})", format_px(radius)));
                }
            }
            "BACKGROUND_BLUR" => {
                if let Some(radius) = effect.radius.filter(|radius| *radius > 0.0) {
                    simplified.backdrop_filter = Some(format!("blur({})", format_px(radius)));
                }
            }
            _ => {
                // Unknown effect kinds carry no CSS meaning; skip quietly
            }
        }
    }

    if !shadows.is_empty() {
        simplified.box_shadow = Some(shadows.join(", "));
    }

    simplified
}

/// `[inset] Xpx Ypx BLURpx [SPREADpx] color`; shadows without a color are
/// dropped
fn format_shadow(effect: &Effect, inset: bool) -> Option<String> {
    let color = effect.color.as_ref()?;
    let offset = effect.offset.unwrap_or(crate::types::Vector { x: 0.0, y: 0.0 });
    let radius = effect.radius.unwrap_or(0.0);
    let css_color = convert_color(color, 1.0).css;

    let mut parts = Vec::with_capacity(6);
    if inset {
        parts.push("inset".to_string());
    }
    parts.push(format_px(offset.x));
    parts.push(format_px(offset.y));
    parts.push(format_px(radius));
    if let Some(spread) = effect.spread.filter(|spread| *spread != 0.0) {
        parts.push(format_px(spread));
    }
    parts.push(css_color);

    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_drop_shadow() {
        let raw = node(json!({
            "id": "1:1", "name": "Card", "type": "FRAME",
            "effects": [{
                "type": "DROP_SHADOW",
                "offset": { "x": 0.0, "y": 4.0 },
                "radius": 8.0,
                "color": { "r": 0.0, "g": 0.0, "b": 0.0, "a": 0.25 }
            }]
        }));
        let effects = build_simplified_effects(&raw);
        assert_eq!(
            effects.box_shadow.as_deref(),
            Some("0px 4px 8px rgba(0, 0, 0, 0.25)")
        );
    }

    #[test]
    fn test_inner_shadow_with_spread() {
        let raw = node(json!({
            "id": "1:1", "name": "Input", "type": "FRAME",
            "effects": [{
                "type": "INNER_SHADOW",
                "offset": { "x": 0.0, "y": 1.0 },
                "radius": 2.0,
                "spread": 1.0,
                "color": { "r": 0.0, "g": 0.0, "b": 0.0, "a": 1.0 }
            }]
        }));
        let effects = build_simplified_effects(&raw);
        assert_eq!(
            effects.box_shadow.as_deref(),
            Some("inset 0px 1px 2px 1px #000000")
        );
    }

    #[test]
    fn test_multiple_shadows_joined() {
        let raw = node(json!({
            "id": "1:1", "name": "Card", "type": "FRAME",
            "effects": [
                {
                    "type": "DROP_SHADOW",
                    "offset": { "x": 0.0, "y": 1.0 },
                    "radius": 2.0,
                    "color": { "r": 0.0, "g": 0.0, "b": 0.0, "a": 0.5 }
                },
                {
                    "type": "DROP_SHADOW",
                    "offset": { "x": 0.0, "y": 4.0 },
                    "radius": 12.0,
                    "color": { "r": 0.0, "g": 0.0, "b": 0.0, "a": 0.1 }
                }
            ]
        }));
        let effects = build_simplified_effects(&raw);
        let shadow = effects.box_shadow.unwrap();
        assert!(shadow.contains(", 0px 4px 12px"));
    }

    #[test]
    fn test_blurs() {
        let raw = node(json!({
            "id": "1:1", "name": "Glass", "type": "FRAME",
            "effects": [
                { "type": "LAYER_BLUR", "radius": 4.0 },
                { "type": "BACKGROUND_BLUR", "radius": 16.0 }
            ]
        }));
        let effects = build_simplified_effects(&raw);
        assert_eq!(effects.filter.as_deref(), Some("blur(4px)"));
        assert_eq!(effects.backdrop_filter.as_deref(), Some("blur(16px)"));
    }

    #[test]
    fn test_invisible_effect_skipped() {
        let raw = node(json!({
            "id": "1:1", "name": "Card", "type": "FRAME",
            "effects": [{
                "type": "DROP_SHADOW",
                "visible": false,
                "offset": { "x": 0.0, "y": 4.0 },
                "radius": 8.0,
                "color": { "r": 0.0, "g": 0.0, "b": 0.0, "a": 0.25 }
            }]
        }));
        assert!(build_simplified_effects(&raw).is_empty());
    }
}
