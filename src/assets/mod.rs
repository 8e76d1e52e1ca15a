//! Trait asset resolution: sources that fetch raw bytes, and the per-run cache in front of them.

/// Per-run memoizing cache, pre-warmed before generation starts.
pub mod cache;
/// Asset source contract and built-in sources.
pub mod source;
