use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TraitstackError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        TraitstackError::asset_fetch("QmAbc", "timed out")
            .to_string()
            .contains("asset fetch error: 'QmAbc'")
    );
    assert!(
        TraitstackError::composite(3, "bad png")
            .to_string()
            .contains("composite error at edition 3")
    );
    assert!(
        TraitstackError::publish(PublishPhase::Final, "503")
            .to_string()
            .contains("publish error (final upload)")
    );
    assert!(
        TraitstackError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn collision_message_names_edition_and_cause() {
    let err = TraitstackError::CollisionLimitExceeded {
        edition: 5,
        attempts: 51,
        cause: CollisionCause::UniqueSpaceExhausted,
    };
    let msg = err.to_string();
    assert!(msg.contains("edition 5"));
    assert!(msg.contains("no unique combinations available"));
    assert_eq!(err.edition(), Some(5));
    assert_eq!(err.kind(), "CollisionLimitExceeded");
}

#[test]
fn edition_is_absent_for_run_level_failures() {
    assert_eq!(TraitstackError::configuration("x").edition(), None);
    assert_eq!(TraitstackError::asset_fetch("a", "b").edition(), None);
    assert_eq!(
        TraitstackError::publish(PublishPhase::Provisional, "x").edition(),
        None
    );
    assert_eq!(TraitstackError::composite(7, "x").edition(), Some(7));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TraitstackError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), "InternalError");
}
