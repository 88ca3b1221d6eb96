//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parsing and repository calls into the extraction use-case.
//! - Keep callers decoupled from storage and clock details.

pub mod context;
pub mod extraction_service;
