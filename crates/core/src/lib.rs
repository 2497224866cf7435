//! # Recess Core
//!
//! Pure business logic for the gap recovery engine - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Analysis algorithms (interval merging, free-slot computation, gap
//!   identity)
//! - Port/adapter interfaces (traits) for the calendar, store, and cache
//!   collaborators
//! - The `GapRecoveryService` orchestrating the public operations
//! - The chat-facing analysis formatter
//!
//! ## Architecture Principles
//! - Only depends on `recess-common` and `recess-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod analysis;
pub mod recovery;

// Re-export specific items to avoid ambiguity
pub use analysis::{compute_free_slots, gap_id, merge_busy_intervals, window_params_hash};
pub use recovery::format::format_analysis;
pub use recovery::ports::{
    AnalysisCache, AnalysisComputation, AnalysisKey, CalendarClient, GapStore,
};
pub use recovery::service::{FillOutcome, GapRecoveryService};
