use super::*;

fn layer(name: &str, variants: &[&str]) -> Layer {
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
        exclusion_rules: vec![],
    }
}

#[test]
fn key_display_matches_pipe_joined_pairs() {
    let bg = layer("Background", &["A", "B"]);
    let eyes = layer("Eyes", &["X", "Y"]);
    let stack = vec![&bg, &eyes];

    let sel = Selection::from_indices(&stack, vec![1, 0]).unwrap();
    assert_eq!(sel.key().to_string(), "Background:B|Eyes:X");
    assert_eq!(sel.variant_names().collect::<Vec<_>>(), vec!["B", "X"]);

    let resolved: Vec<(&str, &str)> = sel
        .resolve(&stack)
        .map(|(l, v)| (l.name.as_str(), v.asset_id.as_str()))
        .collect();
    assert_eq!(resolved, vec![("Background", "B.png"), ("Eyes", "X.png")]);
}

#[test]
fn keys_compare_by_every_pair() {
    let bg = layer("Background", &["A", "B"]);
    let eyes = layer("Eyes", &["X", "Y"]);
    let stack = vec![&bg, &eyes];

    let a = Selection::from_indices(&stack, vec![0, 1]).unwrap();
    let b = Selection::from_indices(&stack, vec![0, 1]).unwrap();
    let c = Selection::from_indices(&stack, vec![1, 1]).unwrap();
    assert_eq!(a.key(), b.key());
    assert_ne!(a.key(), c.key());
    assert_eq!(
        a.key(),
        &CombinationKey::from_pairs([("Background", "A"), ("Eyes", "Y")])
    );
}

#[test]
fn rejects_mismatched_or_out_of_range_picks() {
    let bg = layer("Background", &["A"]);
    let stack = vec![&bg];
    assert!(Selection::from_indices(&stack, vec![]).is_err());
    assert!(Selection::from_indices(&stack, vec![3]).is_err());
}
