//! Run orchestration: editions in order, archive assembly, two-phase publish.

/// Collection assembler and thread-pool plumbing.
pub mod assembler;
/// Job status model and sinks.
pub mod status;
