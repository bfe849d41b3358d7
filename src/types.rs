//! Raw Figma REST API types
//!
//! A typed subset of the `GET /v1/files/:key` and `GET /v1/files/:key/nodes`
//! response shapes, limited to the fields the simplification engine consumes.
//! All of these are read-only once deserialized: the engine never mutates a
//! raw node.

use serde::Deserialize;
use std::collections::HashMap;

/// 2x3 affine transform as returned by the API: `[[sx, k0, tx], [k1, sy, ty]]`
pub type Transform = [[f64; 3]; 2];

/// Node kind as reported by the API (closed set, unknown kinds map to `Other`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Text,
    Slice,
    Component,
    ComponentSet,
    Instance,
    #[serde(other)]
    Other,
}

impl NodeType {
    /// API-style name used in the simplified output
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Canvas => "CANVAS",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Star => "STAR",
            NodeType::Line => "LINE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::RegularPolygon => "REGULAR_POLYGON",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Text => "TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Other => "OTHER",
        }
    }
}

/// RGBA color, all channels in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "one")]
    pub a: f64,
}

fn one() -> f64 {
    1.0
}

/// 2D point in normalized node-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounding box in absolute canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Paint kind (closed set, unknown kinds are a fatal extraction error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Pattern,
    Emoji,
    Video,
    #[serde(other)]
    Unknown,
}

/// Image paint scale mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    Fill,
    Fit,
    Tile,
    Stretch,
}

/// One gradient color stop
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

/// A fill or stroke source
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
    pub color: Option<Color>,
    pub gradient_handle_positions: Option<Vec<Vector>>,
    pub gradient_stops: Option<Vec<ColorStop>>,
    pub scale_mode: Option<ScaleMode>,
    pub image_ref: Option<String>,
    pub image_transform: Option<Transform>,
    pub scaling_factor: Option<f64>,
    pub source_node_id: Option<String>,
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// Text styling block attached to TEXT nodes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    pub font_family: Option<String>,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_case: Option<String>,
    pub text_align_horizontal: Option<String>,
    pub text_align_vertical: Option<String>,
}

impl TypeStyle {
    /// True when no field carries information
    pub fn is_empty(&self) -> bool {
        self == &TypeStyle::default()
    }
}

/// Shadow or blur effect
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: String,
    pub visible: Option<bool>,
    pub color: Option<Color>,
    pub offset: Option<Vector>,
    pub radius: Option<f64>,
    pub spread: Option<f64>,
}

impl Effect {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// Per-edge stroke weights (only present when edges differ)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeWeights {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Component property override on an INSTANCE node
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPropertyValue {
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub property_type: String,
}

/// One node of the raw design tree
///
/// Kind-specific fields are all optional; the API only includes fields
/// relevant to the node's type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub visible: Option<bool>,
    pub children: Option<Vec<RawNode>>,

    // Text
    pub characters: Option<String>,
    pub style: Option<TypeStyle>,

    // Visuals
    pub fills: Option<Vec<Paint>>,
    pub strokes: Option<Vec<Paint>>,
    pub stroke_weight: Option<f64>,
    pub individual_stroke_weights: Option<StrokeWeights>,
    pub stroke_dashes: Option<Vec<f64>>,
    pub effects: Option<Vec<Effect>>,
    pub opacity: Option<f64>,
    pub corner_radius: Option<f64>,
    pub rectangle_corner_radii: Option<[f64; 4]>,

    // Geometry
    pub absolute_bounding_box: Option<Rectangle>,

    // Auto-layout
    pub layout_mode: Option<String>,
    pub layout_wrap: Option<String>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub item_spacing: Option<f64>,
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub layout_sizing_horizontal: Option<String>,
    pub layout_sizing_vertical: Option<String>,
    pub layout_positioning: Option<String>,

    // Instances
    pub component_id: Option<String>,
    pub component_properties: Option<HashMap<String, ComponentPropertyValue>>,
}

impl RawNode {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// True when the node lays out its children with auto-layout
    pub fn is_auto_layout(&self) -> bool {
        matches!(
            self.layout_mode.as_deref(),
            Some("HORIZONTAL") | Some("VERTICAL")
        )
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Component metadata from the file-level `components` table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub key: String,
    pub name: String,
    pub component_set_id: Option<String>,
}

/// Component-set metadata from the file-level `componentSets` table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSet {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

/// `GET /v1/files/:key` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFileResponse {
    pub name: String,
    pub last_modified: String,
    pub thumbnail_url: Option<String>,
    pub document: RawNode,
    #[serde(default)]
    pub components: HashMap<String, Component>,
    #[serde(default)]
    pub component_sets: HashMap<String, ComponentSet>,
}

/// One entry of a `GET /v1/files/:key/nodes` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponseEntry {
    pub document: RawNode,
    #[serde(default)]
    pub components: HashMap<String, Component>,
    #[serde(default)]
    pub component_sets: HashMap<String, ComponentSet>,
}

/// `GET /v1/files/:key/nodes` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFileNodesResponse {
    pub name: String,
    pub last_modified: String,
    pub thumbnail_url: Option<String>,
    pub nodes: HashMap<String, NodeResponseEntry>,
}
