use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn layer(weights: &[f64]) -> Layer {
    Layer {
        name: "L".to_string(),
        z_order: 0,
        variants: weights
            .iter()
            .enumerate()
            .map(|(i, w)| Variant {
                name: format!("v{i}"),
                asset_id: format!("v{i}.png"),
                weight: *w,
            })
            .collect(),
        exclusion_rules: vec![],
    }
}

fn chi_squared(counts: &[u64], weights: &[f64], n: u64) -> f64 {
    let total: f64 = weights.iter().sum();
    counts
        .iter()
        .zip(weights)
        .map(|(&obs, &w)| {
            let expected = n as f64 * w / total;
            let d = obs as f64 - expected;
            d * d / expected
        })
        .sum()
}

#[test]
fn draws_converge_to_weight_ratio_two_variants() {
    let weights = [1.0, 3.0];
    let layer = layer(&weights);
    let mut rng = StdRng::seed_from_u64(7);
    let n = 20_000u64;
    let mut counts = [0u64; 2];
    for _ in 0..n {
        counts[pick(&layer, &mut rng).unwrap()] += 1;
    }
    // df = 1, p = 0.001
    assert!(chi_squared(&counts, &weights, n) < 10.83, "{counts:?}");
}

#[test]
fn draws_converge_to_weight_ratio_fractional_weights() {
    let weights = [0.5, 2.0, 7.5];
    let layer = layer(&weights);
    let mut rng = StdRng::seed_from_u64(42);
    let n = 10_000u64;
    let mut counts = [0u64; 3];
    for _ in 0..n {
        counts[pick(&layer, &mut rng).unwrap()] += 1;
    }
    // df = 2, p = 0.001
    assert!(chi_squared(&counts, &weights, n) < 13.82, "{counts:?}");
}

#[test]
fn zero_weight_variants_are_never_drawn() {
    let layer = layer(&[0.0, 1.0, 0.0]);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..1_000 {
        assert_eq!(pick(&layer, &mut rng).unwrap(), 1);
    }
}

#[test]
fn zero_total_weight_is_a_configuration_error() {
    let layer = layer(&[0.0, 0.0]);
    let mut rng = StdRng::seed_from_u64(1);
    let err = pick(&layer, &mut rng).unwrap_err();
    assert!(matches!(err, TraitstackError::Configuration(_)));
}

#[test]
fn draw_walks_variants_in_declared_order() {
    let l = layer(&[1.0, 3.0]);
    assert_eq!(select_by_draw(&l.variants, 0.0), Some(0));
    assert_eq!(select_by_draw(&l.variants, 0.999), Some(0));
    assert_eq!(select_by_draw(&l.variants, 1.0), Some(1));
    assert_eq!(select_by_draw(&l.variants, 3.999), Some(1));
}

#[test]
fn drift_past_the_end_falls_back_to_last_variant() {
    let l = layer(&[1.0, 3.0, 0.0]);
    assert_eq!(select_by_draw(&l.variants, 4.0), Some(2));
    assert_eq!(select_by_draw(&l.variants, 1e9), Some(2));
    assert_eq!(select_by_draw(&[], 0.0), None);
}
