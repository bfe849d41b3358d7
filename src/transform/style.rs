//! Paint and stroke transformers
//!
//! Each raw paint becomes either a CSS color string, a gradient string, or a
//! structured descriptor (image, pattern). Image descriptors carry the
//! download metadata the image pipeline needs: crop transform, whether final
//! pixel dimensions are required (always for TILE), and a filename suffix
//! that keeps differently-cropped copies of one image ref apart.
//!
//! Unknown paint kinds are a hard error: silently emitting a wrong fill would
//! corrupt whatever the consumer generates from the output.

use crate::error::{Result, SimplifyError};
use crate::extract::model::{
    GradientFill, ImageDownloadArguments, ImageFill, PatternFill, SimplifiedFill, SimplifiedStroke,
};
use crate::transform::colors::{convert_color, format_px, generate_css_shorthand};
use crate::transform::gradients::build_gradient_css;
use crate::types::{Paint, PaintType, RawNode, ScaleMode, Transform};

/// Convert all visible fills of a node
pub fn build_simplified_fills(node: &RawNode) -> Result<Vec<SimplifiedFill>> {
    match &node.fills {
        Some(fills) => fills
            .iter()
            .filter(|paint| paint.is_visible())
            .map(|paint| parse_paint(paint, node))
            .collect(),
        None => Ok(Vec::new()),
    }
}

/// Convert one paint into its simplified form
pub fn parse_paint(paint: &Paint, node: &RawNode) -> Result<SimplifiedFill> {
    match paint.paint_type {
        PaintType::Solid => {
            let color = paint.color.as_ref().ok_or_else(|| {
                SimplifyError::MalformedResponse(format!(
                    "solid paint without color on node {}",
                    node.id
                ))
            })?;
            let css = convert_color(color, paint.opacity.unwrap_or(1.0));
            Ok(SimplifiedFill::Color(css.css))
        }
        PaintType::GradientLinear
        | PaintType::GradientRadial
        | PaintType::GradientAngular
        | PaintType::GradientDiamond => Ok(SimplifiedFill::Gradient(GradientFill {
            fill_type: paint_type_name(paint.paint_type).to_string(),
            gradient: build_gradient_css(paint)?,
        })),
        PaintType::Image => parse_image_paint(paint, node).map(Box::new).map(SimplifiedFill::Image),
        PaintType::Pattern => {
            let source_node_id = paint.source_node_id.clone().ok_or_else(|| {
                SimplifyError::MalformedResponse(format!(
                    "pattern paint without source node on node {}",
                    node.id
                ))
            })?;
            Ok(SimplifiedFill::Pattern(PatternFill {
                fill_type: "PATTERN".to_string(),
                source_node_id,
                scaling_factor: paint.scaling_factor,
            }))
        }
        other => Err(SimplifyError::UnsupportedPaint {
            node_id: node.id.clone(),
            paint_type: format!("{other:?}"),
        }),
    }
}

/// Image paints: pick the CSS rendering strategy from the scale mode and the
/// node shape, and record what the download pipeline must do afterwards
fn parse_image_paint(paint: &Paint, node: &RawNode) -> Result<ImageFill> {
    let image_ref = paint.image_ref.clone().ok_or_else(|| {
        SimplifyError::MalformedResponse(format!("image paint without imageRef on node {}", node.id))
    })?;

    let scale_mode = paint.scale_mode.unwrap_or(ScaleMode::Fill);
    // Nodes with children render the image as a CSS background; leaf nodes
    // become replaceable elements (an <img> with object-fit). TILE only makes
    // sense as a background.
    let is_background = node.has_children() || scale_mode == ScaleMode::Tile;

    let mut fill = ImageFill {
        fill_type: "IMAGE".to_string(),
        image_ref,
        scale_mode: scale_mode_name(scale_mode).to_string(),
        background_size: None,
        background_repeat: None,
        object_fit: None,
        is_background,
        image_download_arguments: ImageDownloadArguments::default(),
    };

    match scale_mode {
        ScaleMode::Fill => {
            if is_background {
                fill.background_size = Some("cover".to_string());
            } else {
                fill.object_fit = Some("cover".to_string());
            }
        }
        ScaleMode::Fit => {
            if is_background {
                fill.background_size = Some("contain".to_string());
            } else {
                fill.object_fit = Some("contain".to_string());
            }
        }
        ScaleMode::Stretch => {
            if is_background {
                fill.background_size = Some("100% 100%".to_string());
            } else {
                fill.object_fit = Some("fill".to_string());
            }
        }
        ScaleMode::Tile => {
            // background-size needs the asset's pixel dimensions, which are
            // only known after download.
            fill.background_repeat = Some("repeat".to_string());
            fill.image_download_arguments.requires_image_dimensions = true;
            fill.image_download_arguments.scaling_factor = paint.scaling_factor;
        }
    }

    if scale_mode != ScaleMode::Tile {
        if let Some(transform) = paint.image_transform {
            fill.image_download_arguments.needs_cropping = true;
            fill.image_download_arguments.crop_transform = Some(transform);
            fill.image_download_arguments.filename_suffix = Some(crop_suffix(&transform));
        }
    }

    Ok(fill)
}

/// Stable short suffix derived from the crop transform, so two crops of the
/// same image ref download to distinct files
pub fn crop_suffix(transform: &Transform) -> String {
    let canonical = format!(
        "{},{},{},{},{},{}",
        transform[0][0], transform[0][1], transform[0][2],
        transform[1][0], transform[1][1], transform[1][2]
    );
    blake3::hash(canonical.as_bytes()).to_hex()[..8].to_string()
}

/// Aggregate visible stroke paints, weight and dash pattern
pub fn build_simplified_strokes(node: &RawNode) -> Result<SimplifiedStroke> {
    let mut stroke = SimplifiedStroke::default();

    if let Some(strokes) = &node.strokes {
        stroke.colors = strokes
            .iter()
            .filter(|paint| paint.is_visible())
            .map(|paint| parse_paint(paint, node))
            .collect::<Result<Vec<_>>>()?;
    }

    if stroke.colors.is_empty() {
        return Ok(stroke);
    }

    stroke.stroke_weight = match node.individual_stroke_weights {
        Some(weights) => {
            generate_css_shorthand(weights.top, weights.right, weights.bottom, weights.left, true)
        }
        None => node
            .stroke_weight
            .filter(|weight| *weight > 0.0)
            .map(format_px),
    };

    if let Some(dashes) = &node.stroke_dashes {
        if !dashes.is_empty() {
            stroke.stroke_dashes = Some(dashes.clone());
        }
    }

    Ok(stroke)
}

fn paint_type_name(paint_type: PaintType) -> &'static str {
    match paint_type {
        PaintType::Solid => "SOLID",
        PaintType::GradientLinear => "GRADIENT_LINEAR",
        PaintType::GradientRadial => "GRADIENT_RADIAL",
        PaintType::GradientAngular => "GRADIENT_ANGULAR",
        PaintType::GradientDiamond => "GRADIENT_DIAMOND",
        PaintType::Image => "IMAGE",
        PaintType::Pattern => "PATTERN",
        PaintType::Emoji => "EMOJI",
        PaintType::Video => "VIDEO",
        PaintType::Unknown => "UNKNOWN",
    }
}

fn scale_mode_name(mode: ScaleMode) -> &'static str {
    match mode {
        ScaleMode::Fill => "FILL",
        ScaleMode::Fit => "FIT",
        ScaleMode::Tile => "TILE",
        ScaleMode::Stretch => "STRETCH",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    fn leaf_with_fill(fill: serde_json::Value) -> RawNode {
        node(json!({
            "id": "1:1", "name": "Shape", "type": "RECTANGLE", "fills": [fill]
        }))
    }

    #[test]
    fn test_solid_opaque_fill() {
        let raw = leaf_with_fill(json!({
            "type": "SOLID",
            "color": { "r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0 }
        }));
        let fills = build_simplified_fills(&raw).unwrap();
        assert_eq!(fills, vec![SimplifiedFill::Color("#FF0000".to_string())]);
    }

    #[test]
    fn test_solid_fill_with_opacity() {
        let raw = leaf_with_fill(json!({
            "type": "SOLID",
            "opacity": 0.5,
            "color": { "r": 1.0, "g": 0.0, "b": 0.0, "a": 0.8 }
        }));
        let fills = build_simplified_fills(&raw).unwrap();
        // 0.5 * 0.8 = 0.4
        assert_eq!(
            fills,
            vec![SimplifiedFill::Color("rgba(255, 0, 0, 0.4)".to_string())]
        );
    }

    #[test]
    fn test_invisible_fill_skipped() {
        let raw = leaf_with_fill(json!({
            "type": "SOLID",
            "visible": false,
            "color": { "r": 1.0, "g": 0.0, "b": 0.0 }
        }));
        assert!(build_simplified_fills(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_paint_is_fatal() {
        let raw = leaf_with_fill(json!({ "type": "HOLOGRAM" }));
        let err = build_simplified_fills(&raw).unwrap_err();
        assert!(matches!(err, SimplifyError::UnsupportedPaint { .. }));
    }

    #[test]
    fn test_image_fill_on_leaf_uses_object_fit() {
        let raw = leaf_with_fill(json!({
            "type": "IMAGE", "scaleMode": "FILL", "imageRef": "abc123"
        }));
        let fills = build_simplified_fills(&raw).unwrap();
        let SimplifiedFill::Image(image) = &fills[0] else {
            panic!("expected image fill");
        };
        assert!(!image.is_background);
        assert_eq!(image.object_fit.as_deref(), Some("cover"));
        assert!(image.background_size.is_none());
    }

    #[test]
    fn test_image_fill_on_container_uses_background() {
        let raw = node(json!({
            "id": "1:1", "name": "Hero", "type": "FRAME",
            "fills": [{ "type": "IMAGE", "scaleMode": "FIT", "imageRef": "abc123" }],
            "children": [{ "id": "1:2", "name": "Title", "type": "TEXT" }]
        }));
        let fills = build_simplified_fills(&raw).unwrap();
        let SimplifiedFill::Image(image) = &fills[0] else {
            panic!("expected image fill");
        };
        assert!(image.is_background);
        assert_eq!(image.background_size.as_deref(), Some("contain"));
    }

    #[test]
    fn test_tile_is_always_background_and_needs_dimensions() {
        let raw = leaf_with_fill(json!({
            "type": "IMAGE", "scaleMode": "TILE", "imageRef": "abc123", "scalingFactor": 0.5
        }));
        let fills = build_simplified_fills(&raw).unwrap();
        let SimplifiedFill::Image(image) = &fills[0] else {
            panic!("expected image fill");
        };
        assert!(image.is_background);
        assert_eq!(image.background_repeat.as_deref(), Some("repeat"));
        assert!(image.image_download_arguments.requires_image_dimensions);
        assert!(!image.image_download_arguments.needs_cropping);
        assert_eq!(image.image_download_arguments.scaling_factor, Some(0.5));
    }

    #[test]
    fn test_stretch_with_transform_needs_cropping() {
        let raw = leaf_with_fill(json!({
            "type": "IMAGE", "scaleMode": "STRETCH", "imageRef": "abc123",
            "imageTransform": [[0.5, 0.0, 0.25], [0.0, 0.5, 0.25]]
        }));
        let fills = build_simplified_fills(&raw).unwrap();
        let SimplifiedFill::Image(image) = &fills[0] else {
            panic!("expected image fill");
        };
        let args = &image.image_download_arguments;
        assert!(args.needs_cropping);
        assert!(args.crop_transform.is_some());
        let suffix = args.filename_suffix.as_ref().unwrap();
        assert_eq!(suffix.len(), 8);
    }

    #[test]
    fn test_crop_suffix_is_stable_and_distinguishes() {
        let a: Transform = [[0.5, 0.0, 0.25], [0.0, 0.5, 0.25]];
        let b: Transform = [[0.5, 0.0, 0.0], [0.0, 0.5, 0.0]];
        assert_eq!(crop_suffix(&a), crop_suffix(&a));
        assert_ne!(crop_suffix(&a), crop_suffix(&b));
    }

    #[test]
    fn test_strokes_with_uniform_weight() {
        let raw = node(json!({
            "id": "1:1", "name": "Shape", "type": "RECTANGLE",
            "strokes": [{ "type": "SOLID", "color": { "r": 0.0, "g": 0.0, "b": 0.0 } }],
            "strokeWeight": 2,
            "strokeDashes": [4.0, 2.0]
        }));
        let stroke = build_simplified_strokes(&raw).unwrap();
        assert_eq!(stroke.colors.len(), 1);
        assert_eq!(stroke.stroke_weight.as_deref(), Some("2px"));
        assert_eq!(stroke.stroke_dashes, Some(vec![4.0, 2.0]));
    }

    #[test]
    fn test_strokes_with_individual_weights() {
        let raw = node(json!({
            "id": "1:1", "name": "Shape", "type": "RECTANGLE",
            "strokes": [{ "type": "SOLID", "color": { "r": 0.0, "g": 0.0, "b": 0.0 } }],
            "individualStrokeWeights": { "top": 1.0, "right": 2.0, "bottom": 3.0, "left": 4.0 }
        }));
        let stroke = build_simplified_strokes(&raw).unwrap();
        assert_eq!(stroke.stroke_weight.as_deref(), Some("1px 2px 3px 4px"));
    }

    #[test]
    fn test_no_visible_strokes_is_empty() {
        let raw = node(json!({
            "id": "1:1", "name": "Shape", "type": "RECTANGLE", "strokeWeight": 2
        }));
        let stroke = build_simplified_strokes(&raw).unwrap();
        assert!(stroke.is_empty());
    }
}
