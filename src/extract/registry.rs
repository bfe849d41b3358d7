//! Global variable registry
//!
//! Content-addressed store living for exactly one extraction. Structurally
//! equal style values (deep equality via canonical JSON serialization, never
//! pointer identity) resolve to one shared id, so a tree with five hundred
//! identically-styled buttons serializes the style once.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::Result;
use crate::extract::model::{GlobalVars, StyleValue};

/// Per-extraction style store; rebuilt fresh for every top-level call
#[derive(Debug, Default)]
pub struct StyleRegistry {
    styles: IndexMap<String, StyleValue>,
    /// canonical serialization -> id, the content-addressing index
    by_canonical: HashMap<String, String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of a structurally equal stored value, or store the value
    /// under a fresh id namespaced by `prefix` (`fill_A1B2C3`)
    pub fn find_or_create(&mut self, value: StyleValue, prefix: &str) -> Result<String> {
        let canonical = serde_json::to_string(&value)?;
        if let Some(existing) = self.by_canonical.get(&canonical) {
            return Ok(existing.clone());
        }

        let mut id = generate_var_id(prefix);
        // Id space is large and the registry lives for one request, so
        // collisions are near-impossible; regenerate anyway since it's cheap.
        while self.styles.contains_key(&id) {
            id = generate_var_id(prefix);
        }

        self.styles.insert(id.clone(), value);
        self.by_canonical.insert(canonical, id.clone());
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StyleValue> {
        self.styles.get(id)
    }

    /// Consume the registry into the serializable document payload
    pub fn into_global_vars(self) -> GlobalVars {
        GlobalVars {
            styles: self.styles,
        }
    }
}

/// `{prefix}_{6 chars of [0-9A-F]}`
fn generate_var_id(prefix: &str) -> String {
    let entropy = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", entropy[..6].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::model::{SimplifiedFill, SimplifiedLayout};

    fn red_fill() -> StyleValue {
        StyleValue::Fills(vec![SimplifiedFill::Color("#FF0000".to_string())])
    }

    #[test]
    fn test_equal_values_share_one_id() {
        let mut registry = StyleRegistry::new();
        let a = registry.find_or_create(red_fill(), "fill").unwrap();
        let b = registry.find_or_create(red_fill(), "fill").unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_values_get_distinct_ids() {
        let mut registry = StyleRegistry::new();
        let a = registry.find_or_create(red_fill(), "fill").unwrap();
        let b = registry
            .find_or_create(
                StyleValue::Fills(vec![SimplifiedFill::Color("#0000FF".to_string())]),
                "fill",
            )
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_id_is_namespaced_by_prefix() {
        let mut registry = StyleRegistry::new();
        let id = registry
            .find_or_create(StyleValue::Layout(SimplifiedLayout::default()), "layout")
            .unwrap();
        assert!(id.starts_with("layout_"));
        assert_eq!(id.len(), "layout_".len() + 6);
    }

    #[test]
    fn test_lookup_after_insert() {
        let mut registry = StyleRegistry::new();
        let id = registry.find_or_create(red_fill(), "fill").unwrap();
        assert_eq!(registry.get(&id), Some(&red_fill()));
    }

    #[test]
    fn test_many_equal_values_hold_one_entry() {
        let mut registry = StyleRegistry::new();
        let first = registry.find_or_create(red_fill(), "fill").unwrap();
        for _ in 0..100 {
            let id = registry.find_or_create(red_fill(), "fill").unwrap();
            assert_eq!(id, first);
        }
        assert_eq!(registry.len(), 1);
    }
}
