use std::collections::HashSet;

use crate::collection::model::Layer;
use crate::collection::selection::{CombinationKey, Selection};

/// Combination keys accepted so far in a run. Grows monotonically.
#[derive(Clone, Debug, Default)]
pub struct SeenCombinations {
    keys: HashSet<CombinationKey>,
}

impl SeenCombinations {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pre-populated with `keys`.
    pub fn with_keys(keys: impl IntoIterator<Item = CombinationKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Whether `key` was already accepted.
    pub fn contains(&self, key: &CombinationKey) -> bool {
        self.keys.contains(key)
    }

    /// Record an accepted key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: CombinationKey) -> bool {
        self.keys.insert(key)
    }

    /// Number of accepted keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Why a candidate selection was turned down. At least one flag is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rejection {
    /// The combination key was already accepted earlier in the run.
    pub duplicate: bool,
    /// An exclusion rule fired.
    pub excluded: bool,
}

/// `true` when `key` has not been accepted yet.
pub fn is_unique(key: &CombinationKey, seen: &SeenCombinations) -> bool {
    !seen.contains(key)
}

/// `true` when no exclusion rule of `stack` fires for `selection`.
///
/// For each layer whose rule triggers on its own pick, every variant picked by another layer is
/// checked for literal membership in the rule's `excludes` list.
pub fn satisfies_exclusions(selection: &Selection, stack: &[&Layer]) -> bool {
    let picked: Vec<&str> = selection.variant_names().collect();
    for (i, layer) in stack.iter().enumerate() {
        let Some(own) = picked.get(i) else {
            continue;
        };
        for rule in layer.exclusion_rules.iter().filter(|r| r.triggers_on(own)) {
            let clash = picked
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .any(|(_, other)| rule.excludes.iter().any(|x| x == other));
            if clash {
                return false;
            }
        }
    }
    true
}

/// Run both checks. Both are always evaluated so the rejection records every reason.
pub fn check(
    selection: &Selection,
    stack: &[&Layer],
    seen: &SeenCombinations,
) -> Result<(), Rejection> {
    let rejection = Rejection {
        duplicate: !is_unique(selection.key(), seen),
        excluded: !satisfies_exclusions(selection, stack),
    };
    if rejection.duplicate || rejection.excluded {
        Err(rejection)
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/validator.rs"]
mod tests;
