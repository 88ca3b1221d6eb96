//! Description command parsing.
//!
//! # Responsibility
//! - Scan descriptions bottom-up for trailing command lines.
//! - Dispatch each command line against the task and its collaborators.
//! - Resolve date tokens used by `\due` and `\start` in the run's timezone.
//!
//! # Invariants
//! - Parsing stops at the first line that is not a valid command.
//! - Parsing never mutates description text above the consumed block.

pub mod datetime;
pub mod dispatch;
pub mod natural;
pub mod scanner;
pub mod zone;
