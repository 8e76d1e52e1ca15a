use super::*;
use crate::collection::model::{ExclusionRule, Variant};

fn layer(name: &str, variants: &[&str], rules: Vec<ExclusionRule>) -> Layer {
    Layer {
        name: name.to_string(),
        z_order: 0,
        variants: variants
            .iter()
            .map(|v| Variant {
                name: (*v).to_string(),
                asset_id: format!("{v}.png"),
                weight: 1.0,
            })
            .collect(),
        exclusion_rules: rules,
    }
}

#[test]
fn uniqueness_is_set_membership() {
    let bg = layer("Bg", &["A", "B"], vec![]);
    let stack = vec![&bg];
    let a = Selection::from_indices(&stack, vec![0]).unwrap();
    let b = Selection::from_indices(&stack, vec![1]).unwrap();

    let mut seen = SeenCombinations::new();
    assert!(is_unique(a.key(), &seen));
    assert!(seen.insert(a.key().clone()));
    assert!(!is_unique(a.key(), &seen));
    assert!(is_unique(b.key(), &seen));
    assert!(!seen.insert(a.key().clone()));
    assert_eq!(seen.len(), 1);
}

#[test]
fn rule_fires_only_for_its_trigger_variant() {
    let hat = layer(
        "Hat",
        &["Crown", "Cap"],
        vec![ExclusionRule::when("Crown", &["Laser"])],
    );
    let eyes = layer("Eyes", &["Laser", "Plain"], vec![]);
    let stack = vec![&hat, &eyes];

    let crown_laser = Selection::from_indices(&stack, vec![0, 0]).unwrap();
    let crown_plain = Selection::from_indices(&stack, vec![0, 1]).unwrap();
    let cap_laser = Selection::from_indices(&stack, vec![1, 0]).unwrap();

    assert!(!satisfies_exclusions(&crown_laser, &stack));
    assert!(satisfies_exclusions(&crown_plain, &stack));
    assert!(satisfies_exclusions(&cap_laser, &stack));
}

#[test]
fn rules_are_not_made_symmetric() {
    let hat = layer("Hat", &["Crown"], vec![]);
    let eyes = layer(
        "Eyes",
        &["Laser"],
        vec![ExclusionRule::when("Laser", &["Crown"])],
    );
    let stack_rule_on_eyes = vec![&hat, &eyes];
    let sel = Selection::from_indices(&stack_rule_on_eyes, vec![0, 0]).unwrap();
    assert!(!satisfies_exclusions(&sel, &stack_rule_on_eyes));

    let eyes_no_rule = layer("Eyes", &["Laser"], vec![]);
    let hat_rule_elsewhere = layer(
        "Hat",
        &["Crown"],
        vec![ExclusionRule::when("Crown", &["Monocle"])],
    );
    let stack = vec![&hat_rule_elsewhere, &eyes_no_rule];
    let sel = Selection::from_indices(&stack, vec![0, 0]).unwrap();
    assert!(satisfies_exclusions(&sel, &stack));
}

#[test]
fn shorthand_rule_applies_to_any_pick_but_ignores_own_layer() {
    let bg = layer(
        "Bg",
        &["Night", "Day"],
        vec![ExclusionRule {
            variant: None,
            excludes: vec!["Sun".to_string(), "Night".to_string()],
        }],
    );
    let sky = layer("Sky", &["Sun", "Moon"], vec![]);
    let stack = vec![&bg, &sky];

    let night_moon = Selection::from_indices(&stack, vec![0, 1]).unwrap();
    let day_sun = Selection::from_indices(&stack, vec![1, 0]).unwrap();
    assert!(satisfies_exclusions(&night_moon, &stack));
    assert!(!satisfies_exclusions(&day_sun, &stack));
}

#[test]
fn check_reports_every_reason() {
    let hat = layer(
        "Hat",
        &["Crown"],
        vec![ExclusionRule::when("Crown", &["Laser"])],
    );
    let eyes = layer("Eyes", &["Laser"], vec![]);
    let stack = vec![&hat, &eyes];
    let sel = Selection::from_indices(&stack, vec![0, 0]).unwrap();

    let seen = SeenCombinations::with_keys([sel.key().clone()]);
    assert_eq!(
        check(&sel, &stack, &seen),
        Err(Rejection {
            duplicate: true,
            excluded: true,
        })
    );
    assert_eq!(
        check(&sel, &stack, &SeenCombinations::new()),
        Err(Rejection {
            duplicate: false,
            excluded: true,
        })
    );
}
