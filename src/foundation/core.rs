use std::fmt;

use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Permanent, content-derived identifier returned by a [`Publisher`](crate::Publisher).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Wrap a publisher-provided address. Surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> TraitstackResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TraitstackError::Other(anyhow::anyhow!(
                "content address must be non-empty"
            )));
        }
        if trimmed.contains('/') {
            return Err(TraitstackError::Other(anyhow::anyhow!(
                "content address '{trimmed}' must not contain '/'"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully-qualified gateway URL for `path` inside the content stored at this address.
    pub fn gateway_url(&self, gateway: &str, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if gateway.ends_with('/') {
            format!("{gateway}{}/{path}", self.0)
        } else {
            format!("{gateway}/{}/{path}", self.0)
        }
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
