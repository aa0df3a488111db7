//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps item and rating ids strictly increasing in
/// insertion order; plain rowids could be reused, and navigation relies on
/// the id ordering matching creation order.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS items (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE    -- case-sensitive; no whitespace
);

-- Ratings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS ratings (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id  INTEGER NOT NULL REFERENCES items(id),
    value    INTEGER NOT NULL CHECK (value BETWEEN -10 AND 10)
);

CREATE INDEX IF NOT EXISTS ratings_item_idx ON ratings(item_id);

PRAGMA user_version = 1;
";
