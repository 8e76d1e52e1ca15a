//! Collection archive: one image and one metadata entry per edition, serialized as ZIP.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use anyhow::Context;
use zip::write::FileOptions;

use crate::foundation::core::ContentAddress;
use crate::foundation::error::{TraitstackError, TraitstackResult};
use crate::generate::edition::EditionRecord;
use crate::metadata::{EditionMetadata, metadata_path};

/// One edition's slot in the archive.
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    /// 1-based edition index.
    pub edition: u32,
    /// Archive-relative image path (`images/{edition}.{ext}`).
    pub image_path: String,
    /// Encoded image bytes.
    pub image: Vec<u8>,
    /// Metadata document for the edition.
    pub metadata: EditionMetadata,
}

/// Append-only archive, ordered by edition index.
#[derive(Clone, Debug, Default)]
pub struct CollectionArchive {
    entries: Vec<ArchiveEntry>,
}

impl CollectionArchive {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next edition. Editions must arrive as 1, 2, 3, ... without gaps.
    pub fn push(&mut self, record: EditionRecord) -> TraitstackResult<()> {
        let expected = self.entries.len() as u64 + 1;
        if u64::from(record.edition) != expected {
            return Err(TraitstackError::Other(anyhow::anyhow!(
                "archive expected edition {expected}, got {}",
                record.edition
            )));
        }
        self.entries.push(ArchiveEntry {
            edition: record.edition,
            image_path: record.image_path,
            image: record.image,
            metadata: record.metadata,
        });
        Ok(())
    }

    /// Entries in edition order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of editions held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no editions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point every metadata image at its permanent location under `address`.
    pub fn rewrite_images(&mut self, address: &ContentAddress, gateway: &str) {
        for entry in &mut self.entries {
            entry.metadata.image = address.gateway_url(gateway, &entry.image_path);
        }
    }

    /// Serialize to ZIP bytes: `images/{i}.*` stored as-is, `metadata/{i}.json` deflated.
    ///
    /// Output is deterministic for identical content (fixed entry timestamps and order).
    pub fn to_zip_bytes(&self) -> TraitstackResult<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let stored = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let deflated =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in &self.entries {
            writer
                .start_file(entry.image_path.as_str(), stored)
                .with_context(|| format!("start archive entry '{}'", entry.image_path))?;
            writer
                .write_all(&entry.image)
                .with_context(|| format!("write archive entry '{}'", entry.image_path))?;

            let path = metadata_path(entry.edition);
            let json = entry.metadata.to_json_pretty()?;
            writer
                .start_file(path.as_str(), deflated)
                .with_context(|| format!("start archive entry '{path}'"))?;
            writer
                .write_all(&json)
                .with_context(|| format!("write archive entry '{path}'"))?;
        }

        let cursor = writer.finish().context("finish zip archive")?;
        Ok(cursor.into_inner())
    }
}

/// Read every file of a ZIP archive into memory, keyed by entry name.
pub fn read_zip_entries(bytes: &[u8]) -> TraitstackResult<BTreeMap<String, Vec<u8>>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("open zip archive")?;
    let mut out = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .with_context(|| format!("open zip entry #{i}"))?;
        let name = file.name().to_string();
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)
            .with_context(|| format!("read zip entry '{name}'"))?;
        out.insert(name, buf);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/archive/archive.rs"]
mod tests;
