//! Content-addressed archive publishing.
//!
//! Publishers upload an archive and hand back the address the store assigned to it. The
//! assembler publishes twice per run and never predicts an address.

/// IPFS pinning-service publisher over HTTP.
#[cfg(feature = "http")]
pub mod pinata;
/// Publisher trait plus local and in-memory stores.
pub mod store;
