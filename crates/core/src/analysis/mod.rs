//! Analysis algorithms
//!
//! The leaf components of the engine: busy-interval merging, free-slot
//! computation over a working-hours window, and content-addressed gap
//! identity. All functions here are pure; nothing in this module
//! performs I/O or persists state.

pub mod free_slots;
pub mod identity;
pub mod merge;

pub use free_slots::compute_free_slots;
pub use identity::{gap_id, window_params_hash};
pub use merge::merge_busy_intervals;
