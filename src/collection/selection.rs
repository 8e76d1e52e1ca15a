use std::fmt;

use crate::collection::model::{Layer, Variant};
use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Ordered `(layer name, variant name)` signature of a selection.
///
/// Two selections are duplicates iff their keys are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinationKey(Vec<(String, String)>);

impl CombinationKey {
    /// Build a key from pairs already in layer order.
    pub fn from_pairs<L, V>(pairs: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(l, v)| (l.into(), v.into()))
                .collect(),
        )
    }

    /// Borrow the ordered pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (layer, variant)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{layer}:{variant}")?;
        }
        Ok(())
    }
}

/// One chosen variant per layer, in render order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    variants: Vec<usize>,
    key: CombinationKey,
}

impl Selection {
    /// Build a selection from per-layer variant indices into `stack`.
    pub fn from_indices(stack: &[&Layer], variants: Vec<usize>) -> TraitstackResult<Self> {
        if stack.len() != variants.len() {
            return Err(TraitstackError::configuration(format!(
                "selection has {} picks for {} layers",
                variants.len(),
                stack.len()
            )));
        }
        let mut pairs = Vec::with_capacity(stack.len());
        for (layer, &idx) in stack.iter().zip(&variants) {
            let v = layer.variants.get(idx).ok_or_else(|| {
                TraitstackError::configuration(format!(
                    "variant index {idx} out of range for layer '{}'",
                    layer.name
                ))
            })?;
            pairs.push((layer.name.clone(), v.name.clone()));
        }
        Ok(Self {
            variants,
            key: CombinationKey(pairs),
        })
    }

    /// Variant index chosen for each layer of the stack.
    pub fn variant_indices(&self) -> &[usize] {
        &self.variants
    }

    /// Combination key identifying this selection.
    pub fn key(&self) -> &CombinationKey {
        &self.key
    }

    /// Chosen variant names in layer order.
    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.key.0.iter().map(|(_, v)| v.as_str())
    }

    /// Pair each stacked layer with its chosen variant.
    ///
    /// `stack` must be the stack the selection was built from.
    pub fn resolve<'a>(
        &'a self,
        stack: &'a [&'a Layer],
    ) -> impl Iterator<Item = (&'a Layer, &'a Variant)> + 'a {
        stack
            .iter()
            .zip(&self.variants)
            .map(|(layer, &idx)| (*layer, &layer.variants[idx]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collection/selection.rs"]
mod tests;
