//! Design extraction facade
//!
//! Normalizes the two raw response shapes (`GET /v1/files/:key` and
//! `GET /v1/files/:key/nodes`) into one traversal input, derives the flat
//! component/component-set tables, and runs the traversal engine. Tables and
//! node-subset entries are sorted by id so output is stable even though the
//! raw maps are unordered.

use indexmap::IndexMap;

use crate::error::{Result, SimplifyError};
use crate::extract::extractors::{all_extractors, Extractor};
use crate::extract::model::{ComponentInfo, ComponentSetInfo, SimplifiedDesign};
use crate::extract::registry::StyleRegistry;
use crate::extract::walker::{extract_from_design, TraversalOptions};
use crate::types::{Component, ComponentSet, GetFileNodesResponse, GetFileResponse, RawNode};

/// Simplify a whole-file response
pub fn simplify_file_response(
    response: &GetFileResponse,
    extractors: &[&dyn Extractor],
    options: &TraversalOptions,
) -> Result<SimplifiedDesign> {
    // The DOCUMENT node itself is organizational; its canvases are the
    // interesting roots.
    let roots: &[RawNode] = match &response.document.children {
        Some(children) if !children.is_empty() => children,
        _ => std::slice::from_ref(&response.document),
    };

    simplify(
        &response.name,
        &response.last_modified,
        response.thumbnail_url.clone(),
        roots,
        response.components.iter(),
        response.component_sets.iter(),
        extractors,
        options,
    )
}

/// Simplify a node-subset response, merging the per-entry component tables
pub fn simplify_nodes_response(
    response: &GetFileNodesResponse,
    extractors: &[&dyn Extractor],
    options: &TraversalOptions,
) -> Result<SimplifiedDesign> {
    let mut entries: Vec<_> = response.nodes.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let roots: Vec<RawNode> = entries
        .iter()
        .map(|(_, entry)| entry.document.clone())
        .collect();
    let components = entries
        .iter()
        .flat_map(|(_, entry)| entry.components.iter());
    let component_sets = entries
        .iter()
        .flat_map(|(_, entry)| entry.component_sets.iter());

    simplify(
        &response.name,
        &response.last_modified,
        response.thumbnail_url.clone(),
        &roots,
        components,
        component_sets,
        extractors,
        options,
    )
}

/// Simplify a raw JSON response, auto-detecting its shape
///
/// Runs the full built-in extractor set.
pub fn simplify_response(
    value: &serde_json::Value,
    options: &TraversalOptions,
) -> Result<SimplifiedDesign> {
    if value.get("document").is_some() {
        let response: GetFileResponse = serde_json::from_value(value.clone())?;
        simplify_file_response(&response, &all_extractors(), options)
    } else if value.get("nodes").is_some() {
        let response: GetFileNodesResponse = serde_json::from_value(value.clone())?;
        simplify_nodes_response(&response, &all_extractors(), options)
    } else {
        Err(SimplifyError::MalformedResponse(
            "response has neither a document nor a nodes field".to_string(),
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn simplify<'a>(
    name: &str,
    last_modified: &str,
    thumbnail_url: Option<String>,
    roots: &[RawNode],
    components: impl Iterator<Item = (&'a String, &'a Component)>,
    component_sets: impl Iterator<Item = (&'a String, &'a ComponentSet)>,
    extractors: &[&dyn Extractor],
    options: &TraversalOptions,
) -> Result<SimplifiedDesign> {
    let mut registry = StyleRegistry::new();
    let nodes = extract_from_design(roots, extractors, options, &mut registry)?;

    Ok(SimplifiedDesign {
        name: name.to_string(),
        last_modified: last_modified.to_string(),
        thumbnail_url,
        nodes,
        components: build_component_table(components),
        component_sets: build_component_set_table(component_sets),
        global_vars: registry.into_global_vars(),
    })
}

fn build_component_table<'a>(
    components: impl Iterator<Item = (&'a String, &'a Component)>,
) -> IndexMap<String, ComponentInfo> {
    let mut table: Vec<_> = components
        .map(|(id, component)| {
            (
                id.clone(),
                ComponentInfo {
                    id: id.clone(),
                    key: component.key.clone(),
                    name: component.name.clone(),
                    component_set_id: component
                        .component_set_id
                        .clone()
                        .filter(|set_id| !set_id.is_empty()),
                },
            )
        })
        .collect();
    table.sort_by(|(a, _), (b, _)| a.cmp(b));
    table.into_iter().collect()
}

fn build_component_set_table<'a>(
    component_sets: impl Iterator<Item = (&'a String, &'a ComponentSet)>,
) -> IndexMap<String, ComponentSetInfo> {
    let mut table: Vec<_> = component_sets
        .map(|(id, set)| {
            (
                id.clone(),
                ComponentSetInfo {
                    id: id.clone(),
                    key: set.key.clone(),
                    name: set.name.clone(),
                    description: set.description.clone().filter(|d| !d.is_empty()),
                },
            )
        })
        .collect();
    table.sort_by(|(a, _), (b, _)| a.cmp(b));
    table.into_iter().collect()
}
