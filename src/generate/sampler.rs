use rand::Rng;

use crate::collection::model::{Layer, Variant};
use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Draw one variant index from `layer`, with probability `weight / total_weight`.
pub fn pick<R: Rng + ?Sized>(layer: &Layer, rng: &mut R) -> TraitstackResult<usize> {
    let total = layer.total_weight();
    if !(total.is_finite() && total > 0.0) {
        return Err(TraitstackError::configuration(format!(
            "layer '{}' cannot be sampled: total weight is {total}",
            layer.name
        )));
    }
    let r = rng.gen_range(0.0..total);
    select_by_draw(&layer.variants, r).ok_or_else(|| {
        TraitstackError::configuration(format!("layer '{}' has no variants", layer.name))
    })
}

/// Map a draw `r` in `[0, total_weight)` onto a variant index.
///
/// Walks variants in declaration order, subtracting each weight from `r`; the first variant with
/// `r < weight` wins. If rounding leaves no winner, the last variant is returned. `None` only for
/// an empty slice.
pub fn select_by_draw(variants: &[Variant], mut r: f64) -> Option<usize> {
    for (idx, v) in variants.iter().enumerate() {
        if r < v.weight {
            return Some(idx);
        }
        r -= v.weight;
    }
    variants.len().checked_sub(1)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/sampler.rs"]
mod tests;
