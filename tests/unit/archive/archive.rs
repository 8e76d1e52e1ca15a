use super::*;
use crate::collection::model::{Layer, Variant};
use crate::collection::selection::Selection;
use crate::metadata::{Attribute, image_path};

fn bg_layer() -> Layer {
    Layer {
        name: "Background".to_string(),
        z_order: 0,
        variants: vec![Variant {
            name: "Red".to_string(),
            asset_id: "red.png".to_string(),
            weight: 1.0,
        }],
        exclusion_rules: vec![],
    }
}

fn record(edition: u32) -> EditionRecord {
    let layer = bg_layer();
    let selection = Selection::from_indices(&[&layer], vec![0]).unwrap();
    let path = image_path(edition, "png");
    EditionRecord {
        edition,
        selection,
        image_path: path.clone(),
        image: vec![edition as u8; 8],
        metadata: EditionMetadata {
            name: format!("Set #{edition}"),
            description: "d".to_string(),
            image: path,
            edition,
            attributes: vec![Attribute {
                trait_type: "Background".to_string(),
                value: "Red".to_string(),
            }],
        },
    }
}

fn archive_of(n: u32) -> CollectionArchive {
    let mut archive = CollectionArchive::new();
    for e in 1..=n {
        archive.push(record(e)).unwrap();
    }
    archive
}

#[test]
fn push_requires_contiguous_editions() {
    let mut archive = CollectionArchive::new();
    assert!(archive.push(record(2)).is_err());
    archive.push(record(1)).unwrap();
    assert!(archive.push(record(1)).is_err());
    archive.push(record(2)).unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.entries()[1].edition, 2);
}

#[test]
fn zip_holds_one_image_and_one_metadata_per_edition() {
    let archive = archive_of(3);
    let files = read_zip_entries(&archive.to_zip_bytes().unwrap()).unwrap();
    assert_eq!(files.len(), 6);
    for e in 1..=3u32 {
        assert_eq!(files[&format!("images/{e}.png")], vec![e as u8; 8]);
        let meta = EditionMetadata::from_json_slice(&files[&format!("metadata/{e}.json")]).unwrap();
        assert_eq!(meta.edition, e);
        assert_eq!(meta.image, format!("images/{e}.png"));
    }
}

#[test]
fn zip_bytes_are_deterministic() {
    let a = archive_of(2).to_zip_bytes().unwrap();
    let b = archive_of(2).to_zip_bytes().unwrap();
    assert_eq!(a, b);
}

#[test]
fn rewrite_points_images_at_the_address() {
    let mut archive = archive_of(2);
    let addr = ContentAddress::new("bafyprov").unwrap();
    archive.rewrite_images(&addr, "https://ipfs.io/ipfs/");

    let files = read_zip_entries(&archive.to_zip_bytes().unwrap()).unwrap();
    let meta = EditionMetadata::from_json_slice(&files["metadata/2.json"]).unwrap();
    assert_eq!(meta.image, "https://ipfs.io/ipfs/bafyprov/images/2.png");
    assert_eq!(meta.attributes[0].value, "Red");
    // Images are untouched by the rewrite.
    assert_eq!(files["images/2.png"], vec![2u8; 8]);
}

#[test]
fn garbage_is_not_a_zip() {
    assert!(read_zip_entries(b"definitely not a zip").is_err());
}
