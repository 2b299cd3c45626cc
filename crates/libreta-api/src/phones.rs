//! Handlers for phone endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/api/v1/phone` | Body: [`PhoneBody`]; returns 201 |
//! | `GET`    | `/api/v1/phone/{id}` | 404 if not found |
//! | `PUT`    | `/api/v1/phone/{id}` | Full replace; the owner never changes |
//! | `PATCH`  | `/api/v1/phone/{id}/number` | Number only |
//! | `DELETE` | `/api/v1/phone/{id}` | `data` is `null` if nothing was deleted |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use libreta_core::{
  contact::ContactId,
  phone::{PhoneDraft, PhoneId},
  store::AddressBookStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  envelope::{Envelope, patched},
  error::ApiError,
  extract::{Json, Path},
};

/// JSON body accepted by phone create, replace and patch endpoints.
///
/// The owner is given as `"contact": <id>`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneBody {
  pub number:  Option<String>,
  pub contact: Option<ContactId>,
}

impl From<PhoneBody> for PhoneDraft {
  fn from(b: PhoneBody) -> Self {
    PhoneDraft {
      number:  b.number,
      contact: b.contact,
    }
  }
}

/// `GET /api/v1/phone/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<PhoneId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let phone = state
    .phones
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("phone {id} not found")))?;
  Ok(Envelope::ok(phone).status(StatusCode::OK))
}

/// `POST /api/v1/phone`: returns 201 and the stored phone.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<PhoneBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(?body, "phone to create");
  let phone = state.phones.create(body.into()).await?;
  Ok(Envelope::ok(phone).status(StatusCode::CREATED))
}

/// `PUT /api/v1/phone/{id}`
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<PhoneId>,
  Json(body): Json<PhoneBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, ?body, "phone to replace");
  let phone = state.phones.replace(id, body.into()).await?;
  Ok(Envelope::ok(phone).status(StatusCode::OK))
}

/// `PATCH /api/v1/phone/{id}/number`
pub async fn patch_number<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<PhoneId>,
  Json(body): Json<PhoneBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, ?body, "phone number to update");
  let outcome = state.phones.patch_number(id, body.clone().into()).await?;
  Ok(patched(id, outcome, body))
}

/// `DELETE /api/v1/phone/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<PhoneId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, "phone to delete");
  let deleted = state.phones.delete(id).await?;
  Ok(Envelope::maybe(deleted).status(StatusCode::OK))
}
