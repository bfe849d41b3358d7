//! Simplified document model
//!
//! The output side of the extraction engine: a compact tree mirroring the raw
//! node tree, where repeated style values are replaced by references into the
//! per-request global variable registry. Everything here serializes to JSON
//! or YAML with empty fields dropped.

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{RawNode, Transform};

/// Top-level simplified document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDesign {
    pub name: String,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub nodes: Vec<SimplifiedNode>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub components: IndexMap<String, ComponentInfo>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub component_sets: IndexMap<String, ComponentSetInfo>,
    pub global_vars: GlobalVars,
}

impl SimplifiedDesign {
    /// Compact YAML rendering, the default LLM-facing output
    pub fn to_yaml(&self) -> crate::error::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Registry payload serialized alongside the node tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlobalVars {
    pub styles: IndexMap<String, StyleValue>,
}

/// One node of the simplified tree
///
/// Style fields hold registry ids (`fill_AB12CD`), never inline values;
/// cheap literals (opacity, border radius, component linkage) stay inline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_properties: Option<Vec<SimplifiedComponentProperty>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SimplifiedNode>,
}

impl SimplifiedNode {
    /// Seed a simplified node with identity fields only; extractors fill in
    /// the rest
    pub fn from_raw(node: &RawNode) -> Self {
        SimplifiedNode {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type.as_str().to_string(),
            text: None,
            text_style: None,
            fills: None,
            strokes: None,
            effects: None,
            layout: None,
            opacity: None,
            border_radius: None,
            component_id: None,
            component_properties: None,
            children: Vec::new(),
        }
    }
}

/// One value stored in the global variable registry
///
/// Untagged: each variant serializes as its payload, so structurally equal
/// values get identical canonical serializations regardless of variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Layout(SimplifiedLayout),
    Text(SimplifiedTextStyle),
    Fills(Vec<SimplifiedFill>),
    Strokes(SimplifiedStroke),
    Effects(SimplifiedEffects),
}

/// Normalized box/flow record produced by the layout transformer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<LayoutSizing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relative_to_parent: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl SimplifiedLayout {
    /// Empty records are skipped instead of registered
    pub fn is_empty(&self) -> bool {
        self == &SimplifiedLayout::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutSizing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Typography record produced by the text transformer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedTextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
}

impl SimplifiedTextStyle {
    pub fn is_empty(&self) -> bool {
        self == &SimplifiedTextStyle::default()
    }
}

/// One simplified fill: a CSS color string or a structured descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimplifiedFill {
    Color(String),
    Gradient(GradientFill),
    Image(Box<ImageFill>),
    Pattern(PatternFill),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientFill {
    #[serde(rename = "type")]
    pub fill_type: String,
    pub gradient: String,
}

/// Image fill descriptor with the CSS rendering choice and the download
/// metadata the image pipeline consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFill {
    #[serde(rename = "type")]
    pub fill_type: String,
    pub image_ref: String,
    pub scale_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_repeat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    pub is_background: bool,
    pub image_download_arguments: ImageDownloadArguments,
}

/// Processing flags forwarded from the paint transformer to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDownloadArguments {
    pub needs_cropping: bool,
    pub requires_image_dimensions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_transform: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename_suffix: Option<String>,
    /// Tile scaling factor applied to the measured dimensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFill {
    #[serde(rename = "type")]
    pub fill_type: String,
    pub source_node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<f64>,
}

/// Aggregated stroke record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedStroke {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<SimplifiedFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dashes: Option<Vec<f64>>,
}

impl SimplifiedStroke {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.stroke_weight.is_none() && self.stroke_dashes.is_none()
    }
}

/// Aggregated shadow/blur record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedEffects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
}

impl SimplifiedEffects {
    pub fn is_empty(&self) -> bool {
        self == &SimplifiedEffects::default()
    }
}

/// Flattened component property override
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedComponentProperty {
    pub name: String,
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub property_type: String,
}

/// Component table entry, derived once per request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
}

/// Component-set table entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSetInfo {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
