//! Composable extractor functions
//!
//! An extractor is one unit of extraction work applied to every visited node:
//! it reads the raw node, runs one or more transformers, and writes onto the
//! partial simplified node. Extractors run in the order given and later ones
//! observe earlier writes, so custom pipelines can layer on top of the
//! built-in set.

use crate::error::Result;
use crate::extract::model::{SimplifiedNode, StyleValue};
use crate::extract::registry::StyleRegistry;
use crate::transform::colors::{format_px, generate_css_shorthand};
use crate::transform::component::{extract_component_id, extract_component_properties};
use crate::transform::effects::build_simplified_effects;
use crate::transform::layout::build_simplified_layout;
use crate::transform::style::{build_simplified_fills, build_simplified_strokes};
use crate::transform::text::{extract_node_text, extract_text_style};
use crate::types::RawNode;

/// Per-node context threaded through the traversal
///
/// Explicit parameter, never ambient state: the registry-in-progress, the
/// parent raw node and the current depth travel together through the call
/// graph.
pub struct NodeContext<'a> {
    pub registry: &'a mut StyleRegistry,
    pub parent: Option<&'a RawNode>,
    pub depth: usize,
}

/// One extraction strategy; closures and plain functions both qualify
pub trait Extractor {
    fn extract(
        &self,
        node: &RawNode,
        out: &mut SimplifiedNode,
        context: &mut NodeContext<'_>,
    ) -> Result<()>;
}

impl<F> Extractor for F
where
    F: Fn(&RawNode, &mut SimplifiedNode, &mut NodeContext<'_>) -> Result<()>,
{
    fn extract(
        &self,
        node: &RawNode,
        out: &mut SimplifiedNode,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        self(node, out, context)
    }
}

/// Layout facet: normalized box/flow record, registered when non-empty
pub fn layout_extractor(
    node: &RawNode,
    out: &mut SimplifiedNode,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    let layout = build_simplified_layout(node, context.parent);
    if !layout.is_empty() {
        out.layout = Some(
            context
                .registry
                .find_or_create(StyleValue::Layout(layout), "layout")?,
        );
    }
    Ok(())
}

/// Text facet: literal content plus a registered typography record
pub fn text_extractor(
    node: &RawNode,
    out: &mut SimplifiedNode,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    out.text = extract_node_text(node);
    if let Some(style) = extract_text_style(node) {
        out.text_style = Some(
            context
                .registry
                .find_or_create(StyleValue::Text(style), "style")?,
        );
    }
    Ok(())
}

/// Visual facet: fills, strokes, effects, opacity and border radius
pub fn visuals_extractor(
    node: &RawNode,
    out: &mut SimplifiedNode,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    let fills = build_simplified_fills(node)?;
    if !fills.is_empty() {
        out.fills = Some(
            context
                .registry
                .find_or_create(StyleValue::Fills(fills), "fill")?,
        );
    }

    let strokes = build_simplified_strokes(node)?;
    if !strokes.is_empty() {
        out.strokes = Some(
            context
                .registry
                .find_or_create(StyleValue::Strokes(strokes), "stroke")?,
        );
    }

    let effects = build_simplified_effects(node);
    if !effects.is_empty() {
        out.effects = Some(
            context
                .registry
                .find_or_create(StyleValue::Effects(effects), "effect")?,
        );
    }

    if let Some(opacity) = node.opacity {
        if opacity < 1.0 {
            out.opacity = Some(opacity);
        }
    }

    out.border_radius = match (node.corner_radius, node.rectangle_corner_radii) {
        (_, Some([top_left, top_right, bottom_right, bottom_left])) => {
            generate_css_shorthand(top_left, top_right, bottom_right, bottom_left, true)
        }
        (Some(radius), None) if radius > 0.0 => Some(format_px(radius)),
        _ => None,
    };

    Ok(())
}

/// Component facet: instance linkage and flattened property overrides
pub fn component_extractor(
    node: &RawNode,
    out: &mut SimplifiedNode,
    _context: &mut NodeContext<'_>,
) -> Result<()> {
    out.component_id = extract_component_id(node);
    out.component_properties = extract_component_properties(node);
    Ok(())
}

/// The full built-in extractor set, in canonical order
pub fn all_extractors() -> Vec<&'static dyn Extractor> {
    vec![
        &layout_extractor,
        &text_extractor,
        &visuals_extractor,
        &component_extractor,
    ]
}

/// Structure-only subset: layout and text without visuals
pub fn layout_and_text() -> Vec<&'static dyn Extractor> {
    vec![&layout_extractor, &text_extractor]
}

/// Styling-only subset: visuals without layout or text
pub fn visuals_only() -> Vec<&'static dyn Extractor> {
    vec![&visuals_extractor]
}
