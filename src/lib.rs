//! traitstack generates collections of unique layered images with matching metadata.
//!
//! A run takes a [`CollectionConfig`] (layers of weighted variants plus exclusion rules) and:
//!
//! - Pre-warms an [`AssetCache`] from an [`AssetSource`]
//! - Draws one weighted variant per layer for every edition, rejecting duplicates and excluded
//!   combinations within a bounded retry budget
//! - Composites each accepted selection through a [`Compositor`]
//! - Publishes the archive twice through a [`Publisher`]: once to learn its content address,
//!   then again with metadata pointing at that address
//!
//! [`CollectionAssembler`] drives the whole run.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Archive assembly and ZIP serialization.
pub mod archive;
/// Asset sources and the per-run asset cache.
pub mod assets;
/// Collection configuration model and selections.
pub mod collection;
/// Layer compositing.
pub mod compose;
/// Generator options.
pub mod config;
/// Weighted sampling, validation and the per-edition retry loop.
pub mod generate;
/// Per-edition metadata documents.
pub mod metadata;
/// Content-addressed publishing.
pub mod publish;
/// Run orchestration and status reporting.
pub mod session;

pub use crate::foundation::core::ContentAddress;
pub use crate::foundation::error::{
    CollisionCause, PublishPhase, TraitstackError, TraitstackResult,
};

pub use crate::archive::{CollectionArchive, read_zip_entries};
pub use crate::assets::cache::AssetCache;
#[cfg(feature = "http")]
pub use crate::assets::source::GatewayAssetSource;
pub use crate::assets::source::{AssetSource, DirAssetSource, MemoryAssetSource};
pub use crate::collection::model::{CollectionConfig, ExclusionRule, Layer, Variant};
pub use crate::collection::selection::{CombinationKey, Selection};
pub use crate::compose::compositor::{Compositor, PngCompositor};
pub use crate::config::GeneratorOpts;
pub use crate::generate::edition::{DEFAULT_MAX_ATTEMPTS, EditionGenerator, EditionRecord};
pub use crate::generate::validator::SeenCombinations;
pub use crate::metadata::{Attribute, EditionMetadata};
#[cfg(feature = "http")]
pub use crate::publish::pinata::PinataPublisher;
pub use crate::publish::store::{DirPublisher, MemoryPublisher, Publisher};
pub use crate::session::assembler::{CollectionAssembler, CollectionOutput, GenerationResult};
pub use crate::session::status::{
    GenerationStatus, InMemoryStatus, JobState, NoopStatus, StatusSink,
};
