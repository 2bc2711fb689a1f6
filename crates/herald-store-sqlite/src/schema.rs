//! SQL schema for the Herald directory.
//!
//! List-valued and preference fields are stored as compact JSON text.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    full_name   TEXT NOT NULL DEFAULT '',
    email       TEXT NOT NULL DEFAULT '',
    preferences TEXT NOT NULL DEFAULT '{}',
    followers   TEXT NOT NULL DEFAULT '[]'   -- user ids
);

CREATE TABLE IF NOT EXISTS groups (
    id               TEXT PRIMARY KEY,
    name             TEXT NOT NULL DEFAULT '',
    email            TEXT,
    use_mailing_list INTEGER NOT NULL DEFAULT 0,
    users            TEXT NOT NULL DEFAULT '[]',   -- user ids
    subgroups        TEXT NOT NULL DEFAULT '[]',   -- group ids
    preferences      TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS projects (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL DEFAULT '',
    members    TEXT NOT NULL DEFAULT '[]',   -- participant wire ids
    moderators TEXT NOT NULL DEFAULT '[]',   -- participant wire ids
    followers  TEXT NOT NULL DEFAULT '[]'    -- user ids
);

PRAGMA user_version = 1;
";
