//! Per-edition generation: weighted sampling, validation and the bounded retry loop.

/// Edition generator and its retry state machine.
pub mod edition;
/// Weighted variant selection.
pub mod sampler;
/// Uniqueness and exclusion checks.
pub mod validator;
