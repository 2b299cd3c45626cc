//! JSON REST API for Libreta.
//!
//! Exposes an axum [`Router`] backed by any
//! [`libreta_core::store::AddressBookStore`]. TLS and transport concerns are
//! the caller's responsibility.
//!
//! Every response, success or failure, is an [`envelope::Envelope`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = libreta_api::api_router(Arc::new(store));
//! ```

pub mod contacts;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod phones;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  response::Redirect,
  routing::{get, patch, post},
};
use libreta_core::{
  lifecycle::{ContactService, PhoneService},
  store::AddressBookStore,
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Services shared by all handlers. Holds no per-request state.
pub struct AppState<S> {
  pub contacts: ContactService<S>,
  pub phones:   PhoneService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      contacts: self.contacts.clone(),
      phones:   self.phones.clone(),
    }
  }
}

impl<S: AddressBookStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      contacts: ContactService::new(Arc::clone(&store)),
      phones:   PhoneService::new(store),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

const INDEX_PATH: &str = "/api/v1/index";

async fn home() -> Redirect { Redirect::to(INDEX_PATH) }

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AddressBookStore + 'static,
{
  Router::new()
    // Landing paths
    .route("/", get(home))
    .route("/api", get(home))
    .route("/api/v1", get(home))
    // Listing and search
    .route(INDEX_PATH, get(contacts::index::<S>))
    .route(
      "/api/v1/index/orderby/{field}/{direction}",
      get(contacts::index_ordered::<S>),
    )
    .route("/api/v1/search/contact/{text}", get(search::handler::<S>))
    // Contacts
    .route("/api/v1/contact", post(contacts::create::<S>))
    .route(
      "/api/v1/contact/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::replace::<S>)
        .delete(contacts::delete::<S>),
    )
    .route("/api/v1/contact/{id}/name", patch(contacts::patch_name::<S>))
    .route(
      "/api/v1/contact/{id}/lastname",
      patch(contacts::patch_surname::<S>),
    )
    .route("/api/v1/contact/{id}/phones", get(contacts::phones_of::<S>))
    // Phones
    .route("/api/v1/phone", post(phones::create::<S>))
    .route(
      "/api/v1/phone/{id}",
      get(phones::get_one::<S>)
        .put(phones::replace::<S>)
        .delete(phones::delete::<S>),
    )
    .route("/api/v1/phone/{id}/number", patch(phones::patch_number::<S>))
    .with_state(AppState::new(store))
}

// ─── Integration tests ────────────────────────────────────────────────────────
