//! # figma-simplify
//!
//! A library for simplifying raw Figma REST API responses into compact,
//! LLM-consumable documents, plus an image resolution and download pipeline
//! for the assets those documents reference.
//!
//! ## Example
//!
//! ```no_run
//! use figma_simplify::extract::{simplify_response, TraversalOptions};
//!
//! let raw: serde_json::Value =
//!     serde_json::from_str(&std::fs::read_to_string("response.json").unwrap()).unwrap();
//!
//! // Simplify the whole file, pruning below depth 10
//! let options = TraversalOptions::default().with_max_depth(10);
//! let design = simplify_response(&raw, &options).unwrap();
//!
//! println!("{}", design.to_yaml().unwrap());
//! println!("{} deduplicated styles", design.global_vars.styles.len());
//! ```

pub mod error;
pub mod extract;
pub mod fetch;
pub mod images;
pub mod transform;
pub mod types;

// Re-export commonly used items
pub use error::{Result, SimplifyError};
pub use extract::{simplify_response, SimplifiedDesign, TraversalOptions};
pub use fetch::FetchClient;
pub use images::{process_images, ImageDownloadItem, ImageProcessingOptions, ImageProcessingResult};
