//! Handler for `GET /api/v1/search/contact/{text}`.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use libreta_core::store::AddressBookStore;

use crate::{AppState, envelope::Envelope, error::ApiError, extract::Path};

/// Contacts whose name or surname starts with, contains, or ends with `text`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(text): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let contacts = state.contacts.search(&text).await?;
  Ok(Envelope::ok(contacts).status(StatusCode::OK))
}
