//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision and a `Z` suffix, so that they sort lexicographically in time
//! order. Decoding happens inside the connection closure, so failures are
//! surfaced as `rusqlite` conversion errors.

use chrono::{DateTime, SecondsFormat, Utc};
use libreta_core::{
  contact::Contact,
  phone::Phone,
  store::{MatchMode, SortField},
};
use rusqlite::{Row, types::Type};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_dt(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let s: String = row.get(idx)?;
  decode_dt(idx, &s)
}

fn get_opt_dt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
  let s: Option<String> = row.get(idx)?;
  s.map(|s| decode_dt(idx, &s)).transpose()
}

// ─── SortField ───────────────────────────────────────────────────────────────

pub fn sort_column(field: SortField) -> &'static str {
  match field {
    SortField::Id => "id",
    SortField::Name => "name",
    SortField::Surname => "surname",
    SortField::CreatedAt => "created_at",
    SortField::UpdatedAt => "updated_at",
  }
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Build a `LIKE ... ESCAPE '\'` pattern that matches `text` literally in the
/// position `mode` asks for.
pub fn like_pattern(text: &str, mode: MatchMode) -> String {
  let mut escaped = String::with_capacity(text.len() + 2);
  for ch in text.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  match mode {
    MatchMode::Prefix => format!("{escaped}%"),
    MatchMode::Contains => format!("%{escaped}%"),
    MatchMode::Suffix => format!("%{escaped}"),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`contact_from_row`].
pub const CONTACT_COLUMNS: &str = "id, name, surname, created_at, updated_at";

/// Column list matching [`phone_from_row`].
pub const PHONE_COLUMNS: &str = "id, contact_id, number, created_at, updated_at";

/// Decode a `contacts` row selected with [`CONTACT_COLUMNS`]. Phones are
/// attached separately.
pub fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
  Ok(Contact {
    id:         row.get(0)?,
    name:       row.get(1)?,
    surname:    row.get(2)?,
    created_at: get_dt(row, 3)?,
    updated_at: get_opt_dt(row, 4)?,
    phones:     Vec::new(),
  })
}

/// Decode a `phones` row selected with [`PHONE_COLUMNS`].
pub fn phone_from_row(row: &Row<'_>) -> rusqlite::Result<Phone> {
  Ok(Phone {
    id:         row.get(0)?,
    contact_id: row.get(1)?,
    number:     row.get(2)?,
    created_at: get_dt(row, 3)?,
    updated_at: get_opt_dt(row, 4)?,
  })
}
