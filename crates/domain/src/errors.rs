//! Error types used throughout the gap recovery engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BusyInterval, GapState};

/// Main error type for Recess gap recovery
///
/// Every variant is recoverable; none is fatal to the process.
/// `InvalidWindow` is returned synchronously before any external call.
/// `Clone` is required so single-flight cache waiters can all observe
/// the same failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GapError {
    #[error("Invalid window: {reason}")]
    InvalidWindow { reason: String },

    #[error("Calendar unavailable during {operation}: {detail}")]
    CalendarUnavailable { operation: String, detail: String },

    #[error("Calendar authorization expired")]
    CalendarAuthExpired,

    #[error("Gap not found: {id}")]
    GapNotFound { id: String },

    #[error("Gap {id} already handled ({state})")]
    GapAlreadyHandled { id: String, state: GapState },

    #[error("Gap {id} is stale: busy {}..{} on calendar {}", conflict.start, conflict.end, conflict.calendar_id)]
    GapStale { id: String, conflict: BusyInterval },

    #[error("Gap {id} fill conflict: event {event_id} was created but the gap was handled concurrently")]
    GapFillConflict { id: String, event_id: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GapError {
    /// Shorthand for boundary validation failures.
    pub fn invalid_window(reason: impl Into<String>) -> Self {
        Self::InvalidWindow { reason: reason.into() }
    }

    /// Shorthand for calendar I/O failures with operation context.
    pub fn calendar_unavailable(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CalendarUnavailable { operation: operation.into(), detail: detail.into() }
    }
}

/// Result type alias for gap recovery operations
pub type Result<T> = std::result::Result<T, GapError>;
