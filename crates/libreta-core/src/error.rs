//! Error types for `libreta-core`.
//!
//! Store backends report their own error type; each one implements
//! [`Classify`] so the services can fold it into [`Error`] exactly once,
//! without knowing which database produced it.

use std::fmt;

use thiserror::Error;

// ─── Classification ──────────────────────────────────────────────────────────

/// The constraint a store rejected a write with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
  /// A uniqueness constraint (including the primary key) was violated.
  DuplicateKey,
  /// A referenced parent record does not exist.
  ForeignKeyViolation,
  /// Any other constraint: NOT NULL, CHECK, and so on.
  Other,
}

impl fmt::Display for ConstraintKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::DuplicateKey => "duplicate key",
      Self::ForeignKeyViolation => "foreign key violation",
      Self::Other => "constraint violation",
    })
  }
}

/// What kind of failure a store error represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  Constraint(ConstraintKind),
  /// I/O, decoding, a closed connection: anything that is not a constraint.
  Unexpected,
}

/// Implemented by store error types.
///
/// The classification must be a pure function of the error code the store
/// reported: the same code always yields the same [`FailureKind`].
pub trait Classify {
  fn failure_kind(&self) -> FailureKind;
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid sort field: {0:?}")]
  InvalidField(String),

  #[error("invalid sort direction: {0:?}")]
  InvalidDirection(String),

  #[error("{kind}: {message}")]
  Constraint {
    kind:    ConstraintKind,
    /// The store's own description of the failure.
    message: String,
  },

  #[error("unexpected store failure: {0}")]
  Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Fold a store error into the service error, using its classification.
  pub fn from_store<E>(err: E) -> Self
  where
    E: Classify + std::error::Error + Send + Sync + 'static,
  {
    match err.failure_kind() {
      FailureKind::Constraint(kind) => Self::Constraint {
        kind,
        message: err.to_string(),
      },
      FailureKind::Unexpected => Self::Unexpected(Box::new(err)),
    }
  }

  /// The constraint kind, if this is a constraint failure.
  pub fn constraint_kind(&self) -> Option<ConstraintKind> {
    match self {
      Self::Constraint { kind, .. } => Some(*kind),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
