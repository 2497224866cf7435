//! Gap recovery orchestration
//!
//! Ports for the external collaborators (calendar, store, cache), the
//! service that wires them to the analysis algorithms, and the
//! chat-facing result formatter.

pub mod format;
pub mod ports;
pub mod service;

pub use format::format_analysis;
pub use ports::{AnalysisCache, AnalysisComputation, AnalysisKey, CalendarClient, GapStore};
pub use service::{FillOutcome, GapRecoveryService};
