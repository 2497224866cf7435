//! # Recess Domain
//!
//! Business domain types and models for the Recess gap recovery engine.
//!
//! This crate contains:
//! - Domain data types (Gap, BusyInterval, AnalysisWindow, etc.)
//! - Domain error types and Result definitions
//! - Request structs with boundary validation
//! - Domain constants and per-user settings
//!
//! ## Architecture
//! - No dependencies on other Recess crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
