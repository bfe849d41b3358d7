//! Traversal engine
//!
//! A single depth-first pre-order walk over the raw tree in document order.
//! Every selected extractor runs against every visited node, so the cost is
//! O(visited nodes x active extractors) with no retraversal per extractor.
//! The registry and the output tree are built together in one pass.

use crate::error::Result;
use crate::extract::extractors::{Extractor, NodeContext};
use crate::extract::model::SimplifiedNode;
use crate::extract::registry::StyleRegistry;
use crate::types::RawNode;

/// Predicate deciding whether a node (and its whole subtree) is kept
pub type NodeFilter = Box<dyn Fn(&RawNode) -> bool>;

/// Options bag for one traversal
#[derive(Default)]
pub struct TraversalOptions {
    /// Maximum depth from each root; the root itself is depth 0
    pub max_depth: Option<usize>,
    /// Rejecting a node excludes the node and its entire subtree
    pub node_filter: Option<NodeFilter>,
}

impl TraversalOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_node_filter(mut self, filter: impl Fn(&RawNode) -> bool + 'static) -> Self {
        self.node_filter = Some(Box::new(filter));
        self
    }
}

/// Walk the given roots, applying every extractor to every visited node
///
/// Invisible nodes, filtered nodes and nodes beyond `max_depth` are dropped
/// together with their subtrees. Extractors run in the given order and
/// mutate the partial node in place; later extractors observe earlier
/// writes within the same visit.
pub fn extract_from_design(
    roots: &[RawNode],
    extractors: &[&dyn Extractor],
    options: &TraversalOptions,
    registry: &mut StyleRegistry,
) -> Result<Vec<SimplifiedNode>> {
    let mut nodes = Vec::with_capacity(roots.len());
    for root in roots {
        if let Some(simplified) = walk_node(root, None, 0, extractors, options, registry)? {
            nodes.push(simplified);
        }
    }
    Ok(nodes)
}

fn walk_node(
    node: &RawNode,
    parent: Option<&RawNode>,
    depth: usize,
    extractors: &[&dyn Extractor],
    options: &TraversalOptions,
    registry: &mut StyleRegistry,
) -> Result<Option<SimplifiedNode>> {
    if !node.is_visible() {
        return Ok(None);
    }
    if let Some(max_depth) = options.max_depth {
        if depth > max_depth {
            return Ok(None);
        }
    }
    if let Some(filter) = &options.node_filter {
        if !filter(node) {
            return Ok(None);
        }
    }

    let mut simplified = SimplifiedNode::from_raw(node);
    {
        let mut context = NodeContext {
            registry,
            parent,
            depth,
        };
        for extractor in extractors {
            extractor.extract(node, &mut simplified, &mut context)?;
        }
    }

    if let Some(children) = &node.children {
        for child in children {
            if let Some(simplified_child) =
                walk_node(child, Some(node), depth + 1, extractors, options, registry)?
            {
                simplified.children.push(simplified_child);
            }
        }
    }

    Ok(Some(simplified))
}
