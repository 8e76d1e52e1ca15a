use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{TraitstackError, TraitstackResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A complete generation request.
///
/// The JSON form matches what the configuration wizard produces: `size` is the edition count,
/// layers carry `order` as their z-order, and unknown fields (`fileName`, `rarityPercent`, ...)
/// are ignored.
pub struct CollectionConfig {
    /// Stable collection identifier, also used as the upload name.
    pub id: String,
    /// Display name, used for edition names (`{name} #{index}`).
    pub name: String,
    /// Optional description copied into every edition's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional ticker-style symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Number of editions to generate.
    #[serde(rename = "size", alias = "editionCount")]
    pub edition_count: u32,
    /// Compositing planes in declaration order.
    pub layers: Vec<Layer>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One compositing plane contributing exactly one variant per edition.
pub struct Layer {
    /// Layer name, unique within the collection. Becomes the metadata `trait_type`.
    pub name: String,
    /// Z-order; ascending values are drawn later (on top).
    #[serde(rename = "order", alias = "zOrder")]
    pub z_order: i32,
    /// Selectable variants in declaration order.
    pub variants: Vec<Variant>,
    /// Exclusion rules evaluated against the other layers' picks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusion_rules: Vec<ExclusionRule>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One selectable trait image within a layer.
pub struct Variant {
    /// Variant name, unique within its layer. Becomes the metadata attribute `value`.
    pub name: String,
    /// Opaque asset identifier resolved by the asset cache.
    pub asset_id: String,
    /// Relative selection weight (finite, `>= 0`).
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "ExclusionRuleRepr")]
/// Declared incompatibility between a variant of the owning layer and named variants elsewhere.
///
/// With `variant: None` the rule applies whatever the owning layer picked. Matching is literal
/// name containment; rules are one-directional unless declared on both layers.
pub struct ExclusionRule {
    /// Variant of the owning layer that triggers the rule, or `None` for any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Variant names that must not be picked by any other layer when the rule triggers.
    pub excludes: Vec<String>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ExclusionRuleRepr {
    Name(String),
    Rule {
        #[serde(default)]
        variant: Option<String>,
        excludes: Vec<String>,
    },
}

impl From<ExclusionRuleRepr> for ExclusionRule {
    fn from(repr: ExclusionRuleRepr) -> Self {
        match repr {
            ExclusionRuleRepr::Name(name) => Self {
                variant: None,
                excludes: vec![name],
            },
            ExclusionRuleRepr::Rule { variant, excludes } => Self { variant, excludes },
        }
    }
}

impl ExclusionRule {
    /// Rule excluding `excludes` whenever the owning layer picks `variant`.
    pub fn when(variant: impl Into<String>, excludes: &[&str]) -> Self {
        Self {
            variant: Some(variant.into()),
            excludes: excludes.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether this rule fires for the owning layer's pick.
    pub fn triggers_on(&self, picked: &str) -> bool {
        self.variant.as_deref().is_none_or(|v| v == picked)
    }
}

impl Layer {
    /// Sum of all variant weights.
    pub fn total_weight(&self) -> f64 {
        self.variants.iter().map(|v| v.weight).sum()
    }

    /// Selection probability of variant `idx` in percent, if the layer can be sampled.
    pub fn rarity_percent(&self, idx: usize) -> Option<f64> {
        let total = self.total_weight();
        if !(total.is_finite() && total > 0.0) {
            return None;
        }
        self.variants.get(idx).map(|v| v.weight / total * 100.0)
    }

    /// Index of the variant called `name`.
    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.name == name)
    }

    /// Number of variants that can actually be drawn (weight > 0).
    pub fn drawable_count(&self) -> usize {
        self.variants.iter().filter(|v| v.weight > 0.0).count()
    }

    fn validate(&self) -> TraitstackResult<()> {
        if self.name.trim().is_empty() {
            return Err(TraitstackError::configuration("layer name must be non-empty"));
        }
        if self.variants.is_empty() {
            return Err(TraitstackError::configuration(format!(
                "layer '{}' has no variants",
                self.name
            )));
        }

        let mut names = HashSet::with_capacity(self.variants.len());
        for v in &self.variants {
            if v.name.trim().is_empty() {
                return Err(TraitstackError::configuration(format!(
                    "layer '{}' has a variant with an empty name",
                    self.name
                )));
            }
            if !names.insert(v.name.as_str()) {
                return Err(TraitstackError::configuration(format!(
                    "layer '{}' declares variant '{}' more than once",
                    self.name, v.name
                )));
            }
            if v.asset_id.trim().is_empty() {
                return Err(TraitstackError::configuration(format!(
                    "variant '{}/{}' has an empty asset id",
                    self.name, v.name
                )));
            }
            if !v.weight.is_finite() || v.weight < 0.0 {
                return Err(TraitstackError::configuration(format!(
                    "variant '{}/{}' weight must be finite and >= 0 (got {})",
                    self.name, v.name, v.weight
                )));
            }
        }

        let total = self.total_weight();
        if !(total.is_finite() && total > 0.0) {
            return Err(TraitstackError::configuration(format!(
                "layer '{}' has total weight {total}; at least one variant needs weight > 0",
                self.name
            )));
        }

        for rule in &self.exclusion_rules {
            if let Some(v) = &rule.variant
                && self.variant_index(v).is_none()
            {
                tracing::warn!(
                    layer = %self.name,
                    variant = %v,
                    "exclusion rule triggers on a variant the layer does not declare"
                );
            }
        }

        Ok(())
    }
}

impl CollectionConfig {
    /// Parse a configuration from JSON text. Does not validate.
    pub fn from_json(text: &str) -> TraitstackResult<Self> {
        serde_json::from_str(text).map_err(|e| TraitstackError::serde(e.to_string()))
    }

    /// Read and parse a configuration file. Does not validate.
    pub fn from_path(path: impl AsRef<Path>) -> TraitstackResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read collection config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> TraitstackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TraitstackError::serde(e.to_string()))
    }

    /// Check every statically detectable configuration error.
    pub fn validate(&self) -> TraitstackResult<()> {
        if self.id.trim().is_empty() {
            return Err(TraitstackError::configuration(
                "collection id must be non-empty",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(TraitstackError::configuration(
                "collection name must be non-empty",
            ));
        }
        if self.edition_count == 0 {
            return Err(TraitstackError::configuration(
                "collection size must be >= 1",
            ));
        }
        if self.layers.is_empty() {
            return Err(TraitstackError::configuration(
                "collection must declare at least one layer",
            ));
        }

        let mut layer_names = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !layer_names.insert(layer.name.as_str()) {
                return Err(TraitstackError::configuration(format!(
                    "layer name '{}' is used more than once",
                    layer.name
                )));
            }
            layer.validate()?;
        }

        for layer in &self.layers {
            for rule in &layer.exclusion_rules {
                for name in &rule.excludes {
                    let known = self
                        .layers
                        .iter()
                        .filter(|other| other.name != layer.name)
                        .any(|other| other.variant_index(name).is_some());
                    if !known {
                        tracing::warn!(
                            layer = %layer.name,
                            excluded = %name,
                            "exclusion rule names a variant no other layer declares"
                        );
                    }
                }
            }
        }

        let space = self.combination_space();
        if u64::from(self.edition_count) > space {
            tracing::warn!(
                editions = self.edition_count,
                combinations = space,
                "requested editions exceed the number of distinct combinations"
            );
        }

        Ok(())
    }

    /// Layers in render order: ascending z-order, ties in declaration order.
    pub fn layer_stack(&self) -> Vec<&Layer> {
        let mut stack: Vec<&Layer> = self.layers.iter().collect();
        stack.sort_by_key(|l| l.z_order);
        stack
    }

    /// Upper bound on distinct combinations (drawable variants multiplied across layers).
    ///
    /// Exclusion rules can only lower the reachable count. Saturates at `u64::MAX`.
    pub fn combination_space(&self) -> u64 {
        self.layers
            .iter()
            .map(|l| l.drawable_count() as u64)
            .fold(1u64, |acc, n| acc.saturating_mul(n))
    }

    /// Description used in edition metadata.
    pub fn edition_description(&self) -> String {
        match &self.description {
            Some(d) if !d.trim().is_empty() => d.clone(),
            _ => format!("A unique NFT from the {} collection.", self.name),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collection/model.rs"]
mod tests;
