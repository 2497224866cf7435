//! Domain types and models

pub mod analysis;
pub mod calendar;
pub mod gap;
pub mod requests;
pub mod settings;

pub use analysis::{AnalysisResult, AnalysisWindow};
pub use calendar::{BusyInterval, EventDraft};
pub use gap::{Gap, GapState};
pub use requests::{AnalyzeRequest, FillGapRequest, SkipGapRequest};
pub use settings::{RecoverySettings, RecoverySettingsUpdate};
