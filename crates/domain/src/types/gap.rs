//! Gap entity and lifecycle states

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a gap
///
/// `Pending` is the only non-terminal state. Terminal states are never
/// revisited by the same gap id: re-running an analysis with identical
/// data must not resurrect a handled gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapState {
    Pending,
    Filled,
    Skipped,
    Dismissed,
    Expired,
}

impl GapState {
    /// Whether this state can never transition again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Filled => "filled",
            Self::Skipped => "skipped",
            Self::Dismissed => "dismissed",
            Self::Expired => "expired",
        }
    }

    /// Parse the storage representation back into a state.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "filled" => Some(Self::Filled),
            "skipped" => Some(Self::Skipped),
            "dismissed" => Some(Self::Dismissed),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for GapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free time interval a user might want to fill with an event
///
/// The id is content-addressed from `(user_id, calendar set, start, end)`,
/// so recomputing the same analysis yields the same id for an unchanged
/// gap. A gap belongs to exactly one user; only the store mutates `state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub id: String,
    pub user_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sorted, de-duplicated set of calendars this gap is free across.
    pub calendar_ids: Vec<String>,
    pub state: GapState,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    /// Stamped when a terminal state is reached.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Set only when `state == Filled`.
    pub filled_event_id: Option<String>,
    /// Optional caller-provided note recorded by `skip`.
    pub skip_reason: Option<String>,
}

impl Gap {
    /// Gap length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether the gap is still actionable.
    pub fn is_pending(&self) -> bool {
        self.state == GapState::Pending
    }

    /// Whether `[start, end]` lies entirely inside this gap.
    pub fn contains_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start && end <= self.end && start < end
    }
}
