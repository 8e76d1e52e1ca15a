use super::*;

#[test]
fn thread_pool_rejects_zero_threads() {
    assert!(matches!(
        build_thread_pool(Some(0)),
        Err(TraitstackError::Configuration(_))
    ));
    assert_eq!(build_thread_pool(Some(2)).unwrap().current_num_threads(), 2);
    build_thread_pool(None).unwrap();
}

#[test]
fn publish_errors_are_tagged_with_their_phase() {
    let wrap = publish_error(PublishPhase::Final);
    let err = wrap(TraitstackError::Other(anyhow::anyhow!("503 from store")));
    match err {
        TraitstackError::Publish { phase, reason } => {
            assert_eq!(phase, PublishPhase::Final);
            assert!(reason.contains("503 from store"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let already = TraitstackError::publish(PublishPhase::Provisional, "x");
    assert!(matches!(
        wrap(already),
        TraitstackError::Publish {
            phase: PublishPhase::Provisional,
            ..
        }
    ));
}
