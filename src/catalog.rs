// 📚 Item catalog - item_type_id → display name, from items.xml
//
// <items>
//   <item><item_type_id>5</item_type_id><item_name>Sword</item_name></item>
// </items>

use crate::error::PipelineError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

pub const UNKNOWN_ITEM_NAME: &str = "unknown";

#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: HashMap<i64, String>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        info!(path = %path.display(), "loading item catalog");
        let text = fs::read_to_string(path).map_err(|e| PipelineError::unavailable(path, e))?;
        let catalog = Self::parse(&text).map_err(|message| PipelineError::reference(path, message))?;
        info!(items = catalog.len(), "item catalog loaded");
        Ok(catalog)
    }

    /// Parse catalog XML
    ///
    /// Items without a usable integer id are skipped. A missing or blank name
    /// becomes "unknown".
    pub fn parse(xml: &str) -> Result<Self, String> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| e.to_string())?;

        let mut names = HashMap::new();
        for item in doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name("item"))
        {
            let child_text = |tag: &str| {
                item.children()
                    .find(|n| n.has_tag_name(tag))
                    .and_then(|n| n.text())
                    .map(str::trim)
            };

            let Some(item_type_id) = child_text("item_type_id").and_then(|t| t.parse::<i64>().ok())
            else {
                continue;
            };

            let name = child_text("item_name")
                .filter(|n| !n.is_empty())
                .unwrap_or(UNKNOWN_ITEM_NAME);
            names.insert(item_type_id, name.to_string());
        }

        Ok(ItemCatalog { names })
    }

    pub fn insert(&mut self, item_type_id: i64, name: impl Into<String>) {
        self.names.insert(item_type_id, name.into());
    }

    /// Display name, or `unknown item <id>` when the catalog lacks the id
    pub fn name(&self, item_type_id: i64) -> String {
        self.names
            .get(&item_type_id)
            .cloned()
            .unwrap_or_else(|| format!("unknown item {}", item_type_id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let xml = r#"<?xml version="1.0"?>
            <items>
                <item><item_type_id>5</item_type_id><item_name> Sword </item_name></item>
                <item><item_type_id>6</item_type_id></item>
                <item><item_type_id>7</item_type_id><item_name></item_name></item>
                <item><item_type_id>oops</item_type_id><item_name>Bad</item_name></item>
                <item><item_name>No id</item_name></item>
            </items>"#;

        let catalog = ItemCatalog::parse(xml).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.name(5), "Sword");
        assert_eq!(catalog.name(6), "unknown");
        assert_eq!(catalog.name(7), "unknown");
        assert_eq!(catalog.name(99), "unknown item 99");
    }

    #[test]
    fn test_malformed_xml_is_reference_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.xml");
        fs::write(&path, "<items><item>").unwrap();

        assert!(matches!(
            ItemCatalog::load(&path),
            Err(PipelineError::ReferenceFormat { .. })
        ));
    }

    #[test]
    fn test_missing_catalog_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ItemCatalog::load(&dir.path().join("items.xml")),
            Err(PipelineError::SourceUnavailable { .. })
        ));
    }
}
