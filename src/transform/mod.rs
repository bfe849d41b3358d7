//! Pure style transformers
//!
//! One module per facet, each mapping raw node fields to a simplified
//! record. All functions here are pure: (node, ancestor context) in,
//! value out, no registry access and no mutation of the raw tree.
//!
//! - `colors`: RGBA + opacity to hex/rgba text, px shorthand helpers
//! - `gradients`: handle geometry to CSS gradient strings
//! - `layout`: auto-layout and constraints to a flexbox-like record
//! - `text`: text content and typography records
//! - `style`: fills, strokes and image download metadata
//! - `effects`: shadows and blurs
//! - `component`: instance component linkage

pub mod colors;
pub mod component;
pub mod effects;
pub mod gradients;
pub mod layout;
pub mod style;
pub mod text;

// Re-export commonly used functions
pub use colors::{convert_color, format_px, generate_css_shorthand};
pub use component::{extract_component_id, extract_component_properties};
pub use effects::build_simplified_effects;
pub use gradients::build_gradient_css;
pub use layout::build_simplified_layout;
pub use style::{build_simplified_fills, build_simplified_strokes, parse_paint};
pub use text::{extract_node_text, extract_text_style};
