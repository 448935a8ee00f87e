//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The clock calls store methods; it never executes SQL directly.

use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    error::ClockResult,
    prefs::PlayerPrefs,
    snapshot::ClockSnapshot,
};

pub struct ClockStore {
    conn: Connection,
}

impl ClockStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> ClockResult<Self> {
        let conn = Connection::open(path)?;
        // In-memory databases ignore WAL.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ClockResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ClockResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, snapshot: &ClockSnapshot) -> ClockResult<()> {
        let state_json = serde_json::to_string(snapshot)?;
        let saved_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO clock_snapshot (session_id, accumulated_days, state_json, saved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![snapshot.session_id, snapshot.accumulated_days, state_json, saved_at],
        )?;
        log::info!(
            "snapshot saved for session {} at {:.3} days",
            snapshot.session_id,
            snapshot.accumulated_days
        );
        Ok(())
    }

    pub fn latest_snapshot(&self, session_id: &str) -> ClockResult<Option<ClockSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM clock_snapshot
                 WHERE session_id = ?1
                 ORDER BY id DESC LIMIT 1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        let snapshot = json
            .map(|j| serde_json::from_str::<ClockSnapshot>(&j))
            .transpose()?;
        Ok(snapshot)
    }

    pub fn snapshot_count(&self, session_id: &str) -> ClockResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM clock_snapshot WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

// ── Player prefs ───────────────────────────────────────────────

impl PlayerPrefs for ClockStore {
    fn get(&self, key: &str) -> ClockResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM player_pref WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> ClockResult<()> {
        self.conn.execute(
            "INSERT INTO player_pref (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
