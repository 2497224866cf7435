//! # Recess Infra
//!
//! Infrastructure adapters for the gap recovery engine.
//!
//! This crate contains:
//! - The SQLite-backed `GapStore` implementation (rusqlite behind an
//!   r2d2 pool)
//! - The moka-backed `AnalysisCache` implementation
//! - Environment-driven configuration for both
//!
//! ## Architecture
//! - Implements the ports defined in `recess-core`
//! - No business logic; state machines and algorithms live in core

pub mod cache;
pub mod config;
pub mod database;

pub use cache::{AnalysisCacheConfig, MokaAnalysisCache};
pub use config::EngineConfig;
pub use database::{open_pool, SqliteGapStore};
