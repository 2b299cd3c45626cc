//! Handlers for contact endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/v1/index` | All live contacts with their phones |
//! | `GET`    | `/api/v1/index/orderby/{field}/{direction}` | `direction` is `asc` or `desc` |
//! | `POST`   | `/api/v1/contact` | Body: [`ContactBody`]; returns 201 |
//! | `GET`    | `/api/v1/contact/{id}` | 404 if not found |
//! | `PUT`    | `/api/v1/contact/{id}` | Full replace; writes even if absent |
//! | `PATCH`  | `/api/v1/contact/{id}/name` | Name only |
//! | `PATCH`  | `/api/v1/contact/{id}/lastname` | Surname only |
//! | `DELETE` | `/api/v1/contact/{id}` | `data` is `null` if nothing was deleted |
//! | `GET`    | `/api/v1/contact/{id}/phones` | 404 if the contact is absent |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use libreta_core::{
  contact::{ContactDraft, ContactId},
  store::{AddressBookStore, Direction},
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  envelope::{Envelope, patched},
  error::ApiError,
  extract::{Json, Path},
};

/// JSON body accepted by contact create, replace and patch endpoints.
///
/// `id`, `createdAt`, `updatedAt`, `deleted` and `phones` may be present and
/// are ignored; the server owns them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
  pub name:    Option<String>,
  pub surname: Option<String>,
}

impl From<ContactBody> for ContactDraft {
  fn from(b: ContactBody) -> Self {
    ContactDraft {
      name:    b.name,
      surname: b.surname,
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/v1/index`
pub async fn index<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let contacts = state.contacts.list_all().await?;
  Ok(Envelope::ok(contacts).status(StatusCode::OK))
}

/// `GET /api/v1/index/orderby/{field}/{direction}`
pub async fn index_ordered<S>(
  State(state): State<AppState<S>>,
  Path((field, direction)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let direction: Direction = direction.parse()?;
  let contacts = state.contacts.list_sorted(&field, direction).await?;
  Ok(Envelope::ok(contacts).status(StatusCode::OK))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/v1/contact/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let contact = state
    .contacts
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Envelope::ok(contact).status(StatusCode::OK))
}

/// `GET /api/v1/contact/{id}/phones`
pub async fn phones_of<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let phones = state
    .contacts
    .phones(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Envelope::ok(phones).status(StatusCode::OK))
}

// ─── Create / replace ─────────────────────────────────────────────────────────

/// `POST /api/v1/contact`: returns 201 and the stored contact.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(?body, "contact to create");
  let contact = state.contacts.create(body.into()).await?;
  Ok(Envelope::ok(contact).status(StatusCode::CREATED))
}

/// `PUT /api/v1/contact/{id}`. The path id overrides any id in the body.
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
  Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, ?body, "contact to replace");
  let contact = state.contacts.replace(id, body.into()).await?;
  Ok(Envelope::ok(contact).status(StatusCode::OK))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /api/v1/contact/{id}/name`
pub async fn patch_name<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
  Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, ?body, "contact name to update");
  let outcome = state.contacts.patch_name(id, body.clone().into()).await?;
  Ok(patched(id, outcome, body))
}

/// `PATCH /api/v1/contact/{id}/lastname`
pub async fn patch_surname<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
  Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, ?body, "contact surname to update");
  let outcome = state.contacts.patch_surname(id, body.clone().into()).await?;
  Ok(patched(id, outcome, body))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/v1/contact/{id}`: returns the contact as it was before
/// deletion.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  tracing::info!(id, "contact to delete");
  let deleted = state.contacts.delete(id).await?;
  Ok(Envelope::maybe(deleted).status(StatusCode::OK))
}
