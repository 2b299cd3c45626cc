//! SQL schema for the Libreta SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use libreta_core::{contact::MAX_NAME_LEN, phone::MAX_NUMBER_LEN};

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Text columns must be non-blank: a value made only of spaces fails the
/// `trim` check just like an empty one.
pub fn schema() -> String {
  format!(
    "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Contacts are soft-deleted: the row stays, `deleted` flips to 1, and every
-- read filters on `deleted = 0`.
CREATE TABLE IF NOT EXISTS contacts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL CHECK (
                  length(name) <= {MAX_NAME_LEN} AND length(trim(name)) > 0
                ),
    surname     TEXT    NOT NULL CHECK (
                  length(surname) <= {MAX_NAME_LEN} AND length(trim(surname)) > 0
                ),
    created_at  TEXT    NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_at  TEXT,               -- RFC 3339 UTC or NULL
    deleted     INTEGER NOT NULL DEFAULT 0 CHECK (deleted IN (0, 1))
);

-- Phones are hard-deleted, either directly or when their contact is deleted.
CREATE TABLE IF NOT EXISTS phones (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id  INTEGER NOT NULL REFERENCES contacts(id),
    number      TEXT    NOT NULL CHECK (
                  length(number) <= {MAX_NUMBER_LEN} AND length(trim(number)) > 0
                ),
    created_at  TEXT    NOT NULL,
    updated_at  TEXT,
    UNIQUE (contact_id, number)
);

CREATE INDEX IF NOT EXISTS contacts_name_idx    ON contacts(name);
CREATE INDEX IF NOT EXISTS contacts_surname_idx ON contacts(surname);
CREATE INDEX IF NOT EXISTS phones_contact_idx   ON phones(contact_id);

PRAGMA user_version = 1;
"
  )
}
