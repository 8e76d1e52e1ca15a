use super::*;

#[test]
fn sha256_address_is_lowercase_hex() {
    let addr = sha256_address(b"abc").unwrap();
    assert_eq!(
        addr.as_str(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn memory_publisher_records_each_call() {
    let publisher = MemoryPublisher::new();
    let a = publisher.publish("col", b"one").unwrap();
    let b = publisher.publish("col", b"two").unwrap();
    assert_ne!(a, b);

    let uploads = publisher.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].bytes, b"one");
    assert_eq!(uploads[1].address, b);
    assert_eq!(publisher.get(&a).unwrap(), b"one");
}

#[test]
fn dir_publisher_writes_blob_named_by_digest() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirPublisher::new(dir.path().join("store"));

    let addr = store.publish("col", b"archive").unwrap();
    assert_eq!(addr, sha256_address(b"archive").unwrap());
    let path = store.blob_path(&addr);
    assert_eq!(std::fs::read(&path).unwrap(), b"archive");

    // Same bytes, same address, no rewrite.
    let again = store.publish("other", b"archive").unwrap();
    assert_eq!(again, addr);
    let entries = std::fs::read_dir(store.root()).unwrap().count();
    assert_eq!(entries, 1);
}
