use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn dir_source_reads_relative_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("bg")).unwrap();
    std::fs::write(dir.path().join("bg/blue.png"), b"blue").unwrap();

    let src = DirAssetSource::new(dir.path());
    assert_eq!(src.fetch("bg/blue.png").unwrap(), b"blue");
    assert_eq!(src.fetch("bg\\blue.png").unwrap(), b"blue");
    assert!(src.fetch("bg/missing.png").is_err());
    assert!(src.fetch("../escape.png").is_err());
}

#[test]
fn memory_source_counts_fetches() {
    let src = MemoryAssetSource::new().with("a", vec![1, 2, 3]);
    assert_eq!(src.fetch("a").unwrap(), vec![1, 2, 3]);
    assert_eq!(src.fetch("a").unwrap(), vec![1, 2, 3]);
    assert_eq!(src.fetch_count("a"), 2);

    let err = src.fetch("b").unwrap_err();
    assert!(matches!(err, TraitstackError::AssetFetch { .. }));
    assert_eq!(src.fetch_count("b"), 1);
    assert_eq!(src.fetch_count("never"), 0);
}
