//! Extraction engine
//!
//! The traversal side of the crate: a single-pass tree walker applying
//! composable extractors to every node, the content-addressed style
//! registry, the simplified output model, and the facade normalizing the
//! two raw response shapes.

pub mod design;
pub mod extractors;
pub mod model;
pub mod registry;
pub mod walker;

// Re-export commonly used items
pub use design::{simplify_file_response, simplify_nodes_response, simplify_response};
pub use extractors::{
    all_extractors, component_extractor, layout_and_text, layout_extractor, text_extractor,
    visuals_extractor, visuals_only, Extractor, NodeContext,
};
pub use model::{SimplifiedDesign, SimplifiedNode, StyleValue};
pub use registry::StyleRegistry;
pub use walker::{extract_from_design, TraversalOptions};
