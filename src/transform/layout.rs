//! Layout transformer
//!
//! Maps Figma's auto-layout and constraint fields onto a normalized flexbox
//! vocabulary. The parent node matters here: a child of a non-auto-layout
//! parent is absolutely positioned, and its location is expressed relative to
//! the parent's bounding box.

use crate::extract::model::{Dimensions, LayoutSizing, Location, SimplifiedLayout};
use crate::transform::colors::{format_px, generate_css_shorthand, round2};
use crate::types::RawNode;

/// Build the normalized layout record for a node
///
/// Returns an empty record (see [`SimplifiedLayout::is_empty`]) when the node
/// carries no layout information worth keeping; callers skip registry
/// insertion in that case.
pub fn build_simplified_layout(node: &RawNode, parent: Option<&RawNode>) -> SimplifiedLayout {
    let mut layout = SimplifiedLayout::default();

    if node.is_auto_layout() {
        layout.mode = match node.layout_mode.as_deref() {
            Some("HORIZONTAL") => Some("row".to_string()),
            Some("VERTICAL") => Some("column".to_string()),
            _ => None,
        };
        layout.justify_content = map_alignment(node.primary_axis_align_items.as_deref());
        layout.align_items = map_alignment(node.counter_axis_align_items.as_deref());
        if node.layout_wrap.as_deref() == Some("WRAP") {
            layout.wrap = Some(true);
        }
        if let Some(spacing) = node.item_spacing {
            if spacing > 0.0 {
                layout.gap = Some(format_px(spacing));
            }
        }
    }

    layout.padding = generate_css_shorthand(
        node.padding_top.unwrap_or(0.0),
        node.padding_right.unwrap_or(0.0),
        node.padding_bottom.unwrap_or(0.0),
        node.padding_left.unwrap_or(0.0),
        true,
    );

    let sizing = LayoutSizing {
        horizontal: map_sizing(node.layout_sizing_horizontal.as_deref()),
        vertical: map_sizing(node.layout_sizing_vertical.as_deref()),
    };
    if sizing != LayoutSizing::default() {
        layout.sizing = Some(sizing);
    }

    // A node is out of flow when it opts out explicitly or when its parent
    // does not run auto-layout at all.
    if let Some(parent) = parent {
        let out_of_flow =
            node.layout_positioning.as_deref() == Some("ABSOLUTE") || !parent.is_auto_layout();
        if out_of_flow {
            layout.position = Some("absolute".to_string());
            if let (Some(own), Some(parent_box)) =
                (node.absolute_bounding_box, parent.absolute_bounding_box)
            {
                layout.location_relative_to_parent = Some(Location {
                    x: round2(own.x - parent_box.x),
                    y: round2(own.y - parent_box.y),
                });
            }
        }
    }

    if let Some(bbox) = node.absolute_bounding_box {
        layout.dimensions = Some(Dimensions {
            width: round2(bbox.width),
            height: round2(bbox.height),
        });
    }

    layout
}

/// Map the API's axis alignment names onto CSS values
///
/// `MIN` is the CSS default (`flex-start`) and is dropped to keep records
/// small.
fn map_alignment(value: Option<&str>) -> Option<String> {
    match value? {
        "MAX" => Some("flex-end".to_string()),
        "CENTER" => Some("center".to_string()),
        "SPACE_BETWEEN" => Some("space-between".to_string()),
        "BASELINE" => Some("baseline".to_string()),
        _ => None,
    }
}

fn map_sizing(value: Option<&str>) -> Option<String> {
    match value? {
        "FIXED" => Some("fixed".to_string()),
        "FILL" => Some("fill".to_string()),
        "HUG" => Some("hug".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_auto_layout_row() {
        let raw = node(json!({
            "id": "1:1", "name": "Row", "type": "FRAME",
            "layoutMode": "HORIZONTAL",
            "primaryAxisAlignItems": "SPACE_BETWEEN",
            "counterAxisAlignItems": "CENTER",
            "itemSpacing": 8,
            "paddingTop": 10, "paddingRight": 20, "paddingBottom": 10, "paddingLeft": 20
        }));
        let layout = build_simplified_layout(&raw, None);
        assert_eq!(layout.mode.as_deref(), Some("row"));
        assert_eq!(layout.justify_content.as_deref(), Some("space-between"));
        assert_eq!(layout.align_items.as_deref(), Some("center"));
        assert_eq!(layout.gap.as_deref(), Some("8px"));
        assert_eq!(layout.padding.as_deref(), Some("10px 20px"));
    }

    #[test]
    fn test_min_alignment_dropped() {
        let raw = node(json!({
            "id": "1:1", "name": "Row", "type": "FRAME",
            "layoutMode": "VERTICAL",
            "primaryAxisAlignItems": "MIN"
        }));
        let layout = build_simplified_layout(&raw, None);
        assert_eq!(layout.mode.as_deref(), Some("column"));
        assert!(layout.justify_content.is_none());
    }

    #[test]
    fn test_child_of_plain_frame_is_absolute() {
        let parent = node(json!({
            "id": "1:1", "name": "Frame", "type": "FRAME",
            "absoluteBoundingBox": { "x": 100.0, "y": 50.0, "width": 400.0, "height": 300.0 }
        }));
        let child = node(json!({
            "id": "1:2", "name": "Box", "type": "RECTANGLE",
            "absoluteBoundingBox": { "x": 130.0, "y": 70.0, "width": 40.0, "height": 20.0 }
        }));
        let layout = build_simplified_layout(&child, Some(&parent));
        assert_eq!(layout.position.as_deref(), Some("absolute"));
        let loc = layout.location_relative_to_parent.unwrap();
        assert_eq!(loc.x, 30.0);
        assert_eq!(loc.y, 20.0);
        let dims = layout.dimensions.unwrap();
        assert_eq!(dims.width, 40.0);
        assert_eq!(dims.height, 20.0);
    }

    #[test]
    fn test_child_in_auto_layout_flow_is_not_absolute() {
        let parent = node(json!({
            "id": "1:1", "name": "Row", "type": "FRAME", "layoutMode": "HORIZONTAL"
        }));
        let child = node(json!({ "id": "1:2", "name": "Box", "type": "RECTANGLE" }));
        let layout = build_simplified_layout(&child, Some(&parent));
        assert!(layout.position.is_none());
    }

    #[test]
    fn test_explicit_absolute_positioning_wins() {
        let parent = node(json!({
            "id": "1:1", "name": "Row", "type": "FRAME", "layoutMode": "HORIZONTAL"
        }));
        let child = node(json!({
            "id": "1:2", "name": "Badge", "type": "FRAME", "layoutPositioning": "ABSOLUTE"
        }));
        let layout = build_simplified_layout(&child, Some(&parent));
        assert_eq!(layout.position.as_deref(), Some("absolute"));
    }

    #[test]
    fn test_sizing_mapped() {
        let raw = node(json!({
            "id": "1:1", "name": "Cell", "type": "FRAME",
            "layoutSizingHorizontal": "FILL",
            "layoutSizingVertical": "HUG"
        }));
        let layout = build_simplified_layout(&raw, None);
        let sizing = layout.sizing.unwrap();
        assert_eq!(sizing.horizontal.as_deref(), Some("fill"));
        assert_eq!(sizing.vertical.as_deref(), Some("hug"));
    }

    #[test]
    fn test_bare_node_is_empty() {
        let raw = node(json!({ "id": "1:1", "name": "Group", "type": "GROUP" }));
        let layout = build_simplified_layout(&raw, None);
        assert!(layout.is_empty());
    }
}
