//! SQL schema for the Medis SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema version so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS records (
    record_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    badge_number  TEXT NOT NULL,
    age           INTEGER NOT NULL,
    job_title     TEXT NOT NULL,
    supervisor    TEXT NOT NULL,
    department    TEXT NOT NULL,
    systolic      INTEGER NOT NULL,  -- mmHg
    diastolic     INTEGER NOT NULL,  -- mmHg
    pulse         INTEGER NOT NULL,  -- bpm
    spo2          REAL NOT NULL,     -- percent
    temperature   REAL NOT NULL,     -- degrees Celsius
    date          TEXT NOT NULL,     -- YYYY-MM-DD
    time_of_entry TEXT NOT NULL,
    color         TEXT NOT NULL,     -- 'green' | 'yellow' | 'orange' | 'red'
    fitness       TEXT NOT NULL,     -- verdict label, kept verbatim
    note          TEXT,
    created_at    TEXT NOT NULL,     -- RFC 3339 UTC, fixed width
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS records_date_idx    ON records(date);
CREATE INDEX IF NOT EXISTS records_created_idx ON records(created_at);

PRAGMA user_version = 1;
";
