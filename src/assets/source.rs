use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Resolves an opaque asset identifier to raw image bytes.
///
/// Called concurrently from the pre-warm pool, once per distinct identifier.
pub trait AssetSource: Send + Sync {
    /// Fetch the bytes behind `asset_id`.
    fn fetch(&self, asset_id: &str) -> TraitstackResult<Vec<u8>>;
}

/// Resolves identifiers as relative paths under a root directory.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory identifiers are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn fetch(&self, asset_id: &str) -> TraitstackResult<Vec<u8>> {
        let rel = normalize_rel_path(asset_id)?;
        let path = self.root.join(Path::new(&rel));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(TraitstackError::from)
    }
}

/// In-memory source keyed by identifier. Counts fetches per identifier.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, Vec<u8>>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, asset_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(asset_id, bytes);
        self
    }

    /// Register `bytes` under `asset_id`.
    pub fn insert(&mut self, asset_id: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(asset_id.into(), bytes);
    }

    /// How many times `asset_id` was fetched.
    pub fn fetch_count(&self, asset_id: &str) -> usize {
        self.fetches
            .lock()
            .map(|m| m.get(asset_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, asset_id: &str) -> TraitstackResult<Vec<u8>> {
        if let Ok(mut m) = self.fetches.lock() {
            *m.entry(asset_id.to_string()).or_default() += 1;
        }
        self.assets
            .get(asset_id)
            .cloned()
            .ok_or_else(|| TraitstackError::asset_fetch(asset_id, "not found"))
    }
}

/// Fetches identifiers from an HTTP gateway as `GET {gateway}{asset_id}`.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct GatewayAssetSource {
    gateway: String,
    timeout: std::time::Duration,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl GatewayAssetSource {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

    /// Source fetching from `gateway` (e.g. `https://ipfs.io/ipfs/`).
    pub fn new(gateway: impl Into<String>, timeout: std::time::Duration) -> TraitstackResult<Self> {
        let gateway = gateway.into();
        if gateway.trim().is_empty() {
            return Err(TraitstackError::configuration(
                "asset gateway url must be non-empty",
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("build asset gateway http client")?;
        Ok(Self {
            gateway,
            timeout,
            client,
        })
    }

    fn url_for(&self, asset_id: &str) -> String {
        if self.gateway.ends_with('/') {
            format!("{}{asset_id}", self.gateway)
        } else {
            format!("{}/{asset_id}", self.gateway)
        }
    }
}

#[cfg(feature = "http")]
impl AssetSource for GatewayAssetSource {
    fn fetch(&self, asset_id: &str) -> TraitstackResult<Vec<u8>> {
        let url = self.url_for(asset_id);
        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                TraitstackError::asset_fetch(
                    asset_id,
                    format!("timed out after {} ms", self.timeout.as_millis()),
                )
            } else {
                TraitstackError::asset_fetch(asset_id, e)
            }
        })?;
        if !response.status().is_success() {
            return Err(TraitstackError::asset_fetch(
                asset_id,
                format!("gateway returned {}", response.status()),
            ));
        }
        let bytes = response
            .bytes()
            .map_err(|e| TraitstackError::asset_fetch(asset_id, e))?;
        Ok(bytes.to_vec())
    }
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> TraitstackResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TraitstackError::configuration("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(TraitstackError::configuration("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TraitstackError::configuration(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(TraitstackError::configuration(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
