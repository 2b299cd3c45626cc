//! The JSON envelope every endpoint answers with.
//!
//! A fresh [`Envelope`] is built for each response; nothing is shared between
//! requests.

use axum::{Json, http::StatusCode, response::IntoResponse};
use libreta_core::lifecycle::PatchOutcome;
use serde::Serialize;

/// `{"error": bool, "message": string|null, "data": ...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub error:   bool,
  pub message: Option<String>,
  pub data:    Option<T>,
}

impl<T: Serialize> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self {
      error:   false,
      message: None,
      data:    Some(data),
    }
  }

  /// Success with an optional payload, e.g. a delete that found nothing.
  pub fn maybe(data: Option<T>) -> Self {
    Self {
      error: false,
      message: None,
      data,
    }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  /// Pair the envelope with a status code.
  pub fn status(self, status: StatusCode) -> impl IntoResponse {
    (status, Json(self))
  }
}

impl Envelope<serde_json::Value> {
  pub fn failure(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
    Self {
      error: true,
      message: Some(message.into()),
      data,
    }
  }
}

/// Payload of a patch response: the updated record, or the submitted body
/// echoed back under the path id when there was nothing to update.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Patched<T, B> {
  Updated(T),
  Unchanged {
    id:        i64,
    #[serde(flatten)]
    submitted: B,
  },
}

/// A patch that found nothing still answers 200; the message is the only
/// thing telling the caller no write happened.
pub fn patched<T, B>(id: i64, outcome: PatchOutcome<T>, body: B) -> impl IntoResponse
where
  T: Serialize,
  B: Serialize,
{
  match outcome {
    PatchOutcome::Updated(record) => {
      Envelope::ok(Patched::Updated(record)).status(StatusCode::OK)
    }
    PatchOutcome::NotFound => Envelope::ok(Patched::Unchanged { id, submitted: body })
      .with_message(format!("no record with id {id}; nothing was updated"))
      .status(StatusCode::OK),
  }
}
