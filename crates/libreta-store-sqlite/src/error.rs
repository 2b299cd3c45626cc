//! Error type for `libreta-store-sqlite`, and its classification.

use libreta_core::error::{Classify, ConstraintKind, FailureKind};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// The SQLite extended result code, if the failure came from SQLite itself.
  pub fn extended_code(&self) -> Option<i32> {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => Some(e.extended_code),
      _ => None,
    }
  }
}

impl Classify for Error {
  fn failure_kind(&self) -> FailureKind {
    self
      .extended_code()
      .map(classify)
      .unwrap_or(FailureKind::Unexpected)
  }
}

/// Map a SQLite extended result code to a [`FailureKind`].
pub fn classify(extended_code: i32) -> FailureKind {
  match extended_code {
    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
      FailureKind::Constraint(ConstraintKind::DuplicateKey)
    }
    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
      FailureKind::Constraint(ConstraintKind::ForeignKeyViolation)
    }
    code if code & 0xff == ffi::SQLITE_CONSTRAINT => {
      FailureKind::Constraint(ConstraintKind::Other)
    }
    _ => FailureKind::Unexpected,
  }
}

/// Build the error SQLite itself would raise for a constraint we check in
/// application code, so that it classifies the same way.
pub(crate) fn constraint_failure(
  extended_code: i32,
  message: String,
) -> rusqlite::Error {
  rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), Some(message))
}
