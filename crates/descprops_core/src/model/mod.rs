//! Domain model for description-driven task updates.
//!
//! # Responsibility
//! - Define the task/project records mutated by extraction.
//! - Define the command grammar recognized in description lines.
//!
//! # Invariants
//! - Every task and project is identified by a stable, non-nil id.
//! - Commands are transient; only their effects are persisted.

pub mod command;
pub mod task;
