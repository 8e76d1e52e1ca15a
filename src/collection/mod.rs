//! Collection configuration and per-edition selections.

/// Layers, variants, exclusion rules and their validation.
pub mod model;
/// Chosen variants for one edition and their combination key.
pub mod selection;
