//! Per-edition metadata documents.

use crate::collection::model::{CollectionConfig, Layer};
use crate::collection::selection::Selection;
use crate::foundation::error::{TraitstackError, TraitstackResult};

/// One `{trait_type, value}` pair.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Layer name.
    pub trait_type: String,
    /// Chosen variant name.
    pub value: String,
}

/// Metadata document stored as `metadata/{edition}.json`.
///
/// Field order is the published schema order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EditionMetadata {
    /// `{collection name} #{edition}`.
    pub name: String,
    /// Collection description.
    pub description: String,
    /// Image reference: archive-relative placeholder until the collection is published.
    pub image: String,
    /// 1-based edition index.
    pub edition: u32,
    /// One attribute per layer, in render order.
    pub attributes: Vec<Attribute>,
}

impl EditionMetadata {
    /// Build provisional metadata whose image points at the archive-relative `image_path`.
    pub fn provisional(
        collection: &CollectionConfig,
        stack: &[&Layer],
        selection: &Selection,
        edition: u32,
        image_path: String,
    ) -> Self {
        let attributes = selection
            .resolve(stack)
            .map(|(layer, variant)| Attribute {
                trait_type: layer.name.clone(),
                value: variant.name.clone(),
            })
            .collect();
        Self {
            name: format!("{} #{edition}", collection.name),
            description: collection.edition_description(),
            image: image_path,
            edition,
            attributes,
        }
    }

    /// Pretty-printed JSON bytes.
    pub fn to_json_pretty(&self) -> TraitstackResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| TraitstackError::serde(e.to_string()))
    }

    /// Parse a metadata document.
    pub fn from_json_slice(bytes: &[u8]) -> TraitstackResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| TraitstackError::serde(e.to_string()))
    }
}

/// Archive path of an edition's image.
pub fn image_path(edition: u32, extension: &str) -> String {
    format!("images/{edition}.{extension}")
}

/// Archive path of an edition's metadata document.
pub fn metadata_path(edition: u32) -> String {
    format!("metadata/{edition}.json")
}

#[cfg(test)]
#[path = "../tests/unit/metadata.rs"]
mod tests;
