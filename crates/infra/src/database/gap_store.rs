//! SQLite implementation of the GapStore port
//!
//! Gap lifecycle rows plus per-user settings. Every state transition is
//! a conditional `UPDATE ... WHERE state = 'pending'`: the row count
//! tells winner from loser, which is the compare-and-swap that prevents
//! double-fill races. Timestamps are stored as unix seconds; the
//! calendar-id set and the settings payload are JSON columns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use recess_common::time::Clock;
use recess_core::GapStore;
use recess_domain::{Gap, GapError, GapState, RecoverySettings, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, instrument};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS gaps (
    id              TEXT NOT NULL,
    user_id         TEXT NOT NULL,
    start_ts        INTEGER NOT NULL,
    end_ts          INTEGER NOT NULL,
    calendar_ids    TEXT NOT NULL,
    state           TEXT NOT NULL,
    created_at      INTEGER NOT NULL,
    last_seen_at    INTEGER NOT NULL,
    resolved_at     INTEGER,
    filled_event_id TEXT,
    skip_reason     TEXT,
    PRIMARY KEY (user_id, id)
);
CREATE INDEX IF NOT EXISTS idx_gaps_user_state ON gaps(user_id, state);

CREATE TABLE IF NOT EXISTS recovery_settings (
    user_id    TEXT PRIMARY KEY,
    payload    TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";

const GAP_COLUMNS: &str = "id, user_id, start_ts, end_ts, calendar_ids, state, \
                           created_at, last_seen_at, resolved_at, filled_event_id, skip_reason";

/// SQLite implementation of `GapStore`
pub struct SqliteGapStore {
    pool: Pool<SqliteConnectionManager>,
    clock: Arc<dyn Clock>,
}

impl SqliteGapStore {
    /// Create the store, bootstrapping the schema idempotently.
    pub fn new(pool: Pool<SqliteConnectionManager>, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = Self { pool, clock };
        store
            .conn()?
            .execute_batch(SCHEMA)
            .map_err(|err| GapError::Storage(format!("schema bootstrap: {err}")))?;
        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|err| GapError::Storage(format!("pool: {err}")))
    }

    /// Conditional `pending -> next` transition; the single winner gets
    /// the updated row back.
    fn transition(
        &self,
        user_id: &str,
        gap_id: &str,
        next: GapState,
        event_id: Option<&str>,
        reason: Option<&str>,
    ) -> Result<Gap> {
        let conn = self.conn()?;
        let now = self.clock.timestamp();

        let updated = conn
            .execute(
                "UPDATE gaps
                 SET state = ?1, resolved_at = ?2, filled_event_id = ?3, skip_reason = ?4
                 WHERE user_id = ?5 AND id = ?6 AND state = 'pending'",
                params![next.as_str(), now, event_id, reason, user_id, gap_id],
            )
            .map_err(|err| GapError::Storage(format!("transition: {err}")))?;

        if updated == 0 {
            let state: Option<String> = conn
                .query_row(
                    "SELECT state FROM gaps WHERE user_id = ?1 AND id = ?2",
                    params![user_id, gap_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| GapError::Storage(format!("transition lookup: {err}")))?;
            return Err(match state {
                None => GapError::GapNotFound { id: gap_id.to_string() },
                Some(state) => GapError::GapAlreadyHandled {
                    id: gap_id.to_string(),
                    state: parse_state(&state)?,
                },
            });
        }

        fetch_gap(&conn, user_id, gap_id)?
            .ok_or_else(|| GapError::Storage(format!("gap {gap_id} vanished mid-transition")))
    }
}

#[async_trait]
impl GapStore for SqliteGapStore {
    #[instrument(skip(self, candidates), fields(user_id = %user_id, candidates = candidates.len()))]
    async fn reconcile(
        &self,
        user_id: &str,
        horizon: DateTime<Utc>,
        candidates: Vec<Gap>,
    ) -> Result<Vec<Gap>> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|err| GapError::Storage(format!("reconcile begin: {err}")))?;
        let now = self.clock.timestamp();

        let expired = tx
            .execute(
                "UPDATE gaps SET state = 'expired', resolved_at = ?1
                 WHERE user_id = ?2 AND state = 'pending' AND end_ts < ?3",
                params![now, user_id, horizon.timestamp()],
            )
            .map_err(|err| GapError::Storage(format!("reconcile expire: {err}")))?;
        if expired > 0 {
            info!(user_id = %user_id, count = expired, "expired pending gaps behind the horizon");
        }

        let mut surviving = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let state: Option<String> = tx
                .query_row(
                    "SELECT state FROM gaps WHERE user_id = ?1 AND id = ?2",
                    params![user_id, candidate.id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| GapError::Storage(format!("reconcile lookup: {err}")))?;

            match state.as_deref() {
                None => {
                    let calendar_ids = serde_json::to_string(&candidate.calendar_ids)
                        .map_err(|err| GapError::Storage(format!("encode calendars: {err}")))?;
                    tx.execute(
                        "INSERT INTO gaps
                         (id, user_id, start_ts, end_ts, calendar_ids, state,
                          created_at, last_seen_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?6)",
                        params![
                            candidate.id,
                            user_id,
                            candidate.start.timestamp(),
                            candidate.end.timestamp(),
                            calendar_ids,
                            now,
                        ],
                    )
                    .map_err(|err| GapError::Storage(format!("reconcile insert: {err}")))?;
                    surviving.push(candidate);
                }
                Some("pending") => {
                    tx.execute(
                        "UPDATE gaps SET last_seen_at = ?1 WHERE user_id = ?2 AND id = ?3",
                        params![now, user_id, candidate.id],
                    )
                    .map_err(|err| GapError::Storage(format!("reconcile touch: {err}")))?;
                    if let Some(stored) = fetch_gap(&tx, user_id, &candidate.id)? {
                        surviving.push(stored);
                    }
                }
                Some("expired") => {
                    debug!(gap_id = %candidate.id, "suppressing expired gap");
                }
                Some(state) => {
                    debug!(gap_id = %candidate.id, state, "suppressing handled gap");
                }
            }
        }

        tx.commit().map_err(|err| GapError::Storage(format!("reconcile commit: {err}")))?;
        Ok(surviving)
    }

    #[instrument(skip(self), fields(user_id = %user_id, gap_id = %gap_id))]
    async fn get(&self, user_id: &str, gap_id: &str) -> Result<Option<Gap>> {
        fetch_gap(&*self.conn()?, user_id, gap_id)
    }

    #[instrument(skip(self), fields(user_id = %user_id, gap_id = %gap_id))]
    async fn fill(&self, user_id: &str, gap_id: &str, event_id: &str) -> Result<Gap> {
        self.transition(user_id, gap_id, GapState::Filled, Some(event_id), None)
    }

    #[instrument(skip(self, reason), fields(user_id = %user_id, gap_id = %gap_id))]
    async fn skip(&self, user_id: &str, gap_id: &str, reason: Option<String>) -> Result<Gap> {
        self.transition(user_id, gap_id, GapState::Skipped, None, reason.as_deref())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn dismiss_all(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let now = self.clock.timestamp();

        let dismissed = conn
            .execute(
                "UPDATE gaps SET state = 'dismissed', resolved_at = ?1
                 WHERE user_id = ?2 AND state = 'pending'",
                params![now, user_id],
            )
            .map_err(|err| GapError::Storage(format!("dismiss_all: {err}")))?;

        debug!(user_id = %user_id, count = dismissed, "dismissed pending gaps");
        Ok(dismissed)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn settings(&self, user_id: &str) -> Result<RecoverySettings> {
        let payload: Option<String> = self
            .conn()?
            .query_row(
                "SELECT payload FROM recovery_settings WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| GapError::Storage(format!("settings read: {err}")))?;

        match payload {
            None => Ok(RecoverySettings::default()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| GapError::Storage(format!("settings decode: {err}"))),
        }
    }

    #[instrument(skip(self, settings), fields(user_id = %user_id))]
    async fn save_settings(&self, user_id: &str, settings: &RecoverySettings) -> Result<()> {
        let payload = serde_json::to_string(settings)
            .map_err(|err| GapError::Storage(format!("settings encode: {err}")))?;

        self.conn()?
            .execute(
                "INSERT INTO recovery_settings (user_id, payload, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                     payload = excluded.payload,
                     updated_at = excluded.updated_at",
                params![user_id, payload, self.clock.timestamp()],
            )
            .map_err(|err| GapError::Storage(format!("settings write: {err}")))?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id, enabled))]
    async fn set_analysis_enabled(&self, user_id: &str, enabled: bool) -> Result<()> {
        let mut settings = self.settings(user_id).await?;
        settings.enabled = enabled;
        self.save_settings(user_id, &settings).await
    }
}

fn parse_state(value: &str) -> Result<GapState> {
    GapState::parse(value)
        .ok_or_else(|| GapError::Storage(format!("unknown gap state '{value}'")))
}

fn ts_to_instant(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| GapError::Storage(format!("timestamp {ts} out of range")))
}

/// Load one gap row, decoding the JSON and timestamp columns.
fn fetch_gap(conn: &Connection, user_id: &str, gap_id: &str) -> Result<Option<Gap>> {
    type Row = (
        String,
        String,
        i64,
        i64,
        String,
        String,
        i64,
        i64,
        Option<i64>,
        Option<String>,
        Option<String>,
    );

    let row: Option<Row> = conn
        .query_row(
            &format!("SELECT {GAP_COLUMNS} FROM gaps WHERE user_id = ?1 AND id = ?2"),
            params![user_id, gap_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                    row.get(10)?,
                ))
            },
        )
        .optional()
        .map_err(|err| GapError::Storage(format!("gap read: {err}")))?;

    let Some((
        id,
        user_id,
        start_ts,
        end_ts,
        calendar_ids,
        state,
        created_at,
        last_seen_at,
        resolved_at,
        filled_event_id,
        skip_reason,
    )) = row
    else {
        return Ok(None);
    };

    Ok(Some(Gap {
        id,
        user_id,
        start: ts_to_instant(start_ts)?,
        end: ts_to_instant(end_ts)?,
        calendar_ids: serde_json::from_str(&calendar_ids)
            .map_err(|err| GapError::Storage(format!("decode calendars: {err}")))?,
        state: parse_state(&state)?,
        created_at: ts_to_instant(created_at)?,
        last_seen_at: ts_to_instant(last_seen_at)?,
        resolved_at: resolved_at.map(ts_to_instant).transpose()?,
        filled_event_id,
        skip_reason,
    }))
}
