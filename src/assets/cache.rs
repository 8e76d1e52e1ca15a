use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::source::AssetSource;
use crate::collection::model::Layer;
use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Raw trait image bytes for one run, keyed by asset identifier.
///
/// Built once by [`AssetCache::prewarm`]; read-only afterwards and safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct AssetCache {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl AssetCache {
    /// Fetch every distinct asset referenced by `layers`, each exactly once.
    ///
    /// Fetches run on the current rayon pool. Any failure (including an empty body) aborts the
    /// whole pre-warm; the first failing identifier in reference order is reported.
    #[tracing::instrument(skip_all)]
    pub fn prewarm<'a>(
        layers: impl IntoIterator<Item = &'a Layer>,
        source: &dyn AssetSource,
    ) -> TraitstackResult<Self> {
        let ids = distinct_asset_ids(layers);
        let fetched: Vec<TraitstackResult<Vec<u8>>> = ids
            .par_iter()
            .map(|id| source.fetch(id))
            .collect();

        let mut entries = HashMap::with_capacity(ids.len());
        for (id, result) in ids.into_iter().zip(fetched) {
            let bytes = result.map_err(|e| match e {
                TraitstackError::AssetFetch { .. } => e,
                other => TraitstackError::asset_fetch(id.as_str(), other),
            })?;
            if bytes.is_empty() {
                return Err(TraitstackError::asset_fetch(id, "empty body"));
            }
            entries.insert(id, Arc::new(bytes));
        }

        tracing::info!(assets = entries.len(), "asset cache pre-warmed");
        Ok(Self { entries })
    }

    /// Cached bytes for `asset_id`.
    pub fn get(&self, asset_id: &str) -> TraitstackResult<&[u8]> {
        self.entries
            .get(asset_id)
            .map(|b| b.as_slice())
            .ok_or_else(|| TraitstackError::asset_fetch(asset_id, "not present in asset cache"))
    }

    /// Whether `asset_id` is cached.
    pub fn contains(&self, asset_id: &str) -> bool {
        self.entries.contains_key(asset_id)
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Distinct asset identifiers across `layers`, in first-reference order.
pub fn distinct_asset_ids<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for layer in layers {
        for v in &layer.variants {
            if seen.insert(v.asset_id.as_str()) {
                out.push(v.asset_id.clone());
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
