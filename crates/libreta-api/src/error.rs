//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Constraint failures caused by the client's data are 400s with a fixed,
//! readable message. Everything else the store reports is a 500 carrying the
//! raw message, plus the cause chain for unexpected failures.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use libreta_core::error::{ConstraintKind, Error as CoreError};
use serde_json::json;
use thiserror::Error;

use crate::envelope::Envelope;

pub const DUPLICATE_MESSAGE: &str = "the record is already registered";
pub const MISSING_PARENT_MESSAGE: &str = "the referenced contact does not exist";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// The request itself could not be read: a malformed path segment, a body
  /// that is not JSON, or a missing `Content-Type`.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  fn parts(&self) -> (StatusCode, String, Option<serde_json::Value>) {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone(), None),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone(), None),
      ApiError::Core(e) => match e {
        CoreError::InvalidField(_) | CoreError::InvalidDirection(_) => {
          (StatusCode::BAD_REQUEST, e.to_string(), None)
        }
        CoreError::Constraint { kind, message } => match kind {
          ConstraintKind::DuplicateKey => {
            (StatusCode::BAD_REQUEST, DUPLICATE_MESSAGE.to_owned(), None)
          }
          ConstraintKind::ForeignKeyViolation => (
            StatusCode::BAD_REQUEST,
            MISSING_PARENT_MESSAGE.to_owned(),
            None,
          ),
          ConstraintKind::Other => {
            (StatusCode::INTERNAL_SERVER_ERROR, message.clone(), None)
          }
        },
        CoreError::Unexpected(source) => (
          StatusCode::INTERNAL_SERVER_ERROR,
          e.to_string(),
          Some(json!({ "cause": cause_chain(&**source) })),
        ),
      },
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

fn cause_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
  let mut chain = vec![err.to_string()];
  let mut current = err.source();
  while let Some(e) = current {
    chain.push(e.to_string());
    current = e.source();
  }
  chain
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, data) = self.parts();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, "request rejected");
    }
    (status, Json(Envelope::failure(message, data))).into_response()
  }
}
