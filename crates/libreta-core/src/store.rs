//! The `AddressBookStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `libreta-store-sqlite`).
//! The services in [`crate::lifecycle`] and [`crate::search`] depend on this
//! abstraction, not on any concrete backend.

use std::{fmt, future::Future, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{
  contact::{Contact, ContactDraft, ContactId},
  error::{Classify, Error},
  phone::{Phone, PhoneDraft, PhoneId},
};

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// A contact field that listings can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
  Id,
  Name,
  Surname,
  CreatedAt,
  UpdatedAt,
}

impl FromStr for SortField {
  type Err = Error;

  /// Accepts the JSON field names as well as the legacy column names
  /// (`nombre`, `apellido`) older clients still send.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "id" => Ok(Self::Id),
      "name" | "nombre" => Ok(Self::Name),
      "surname" | "apellido" => Ok(Self::Surname),
      "createdAt" | "created_at" => Ok(Self::CreatedAt),
      "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
      other => Err(Error::InvalidField(other.to_owned())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
  #[default]
  Asc,
  Desc,
}

impl FromStr for Direction {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.eq_ignore_ascii_case("asc") {
      Ok(Self::Asc)
    } else if s.eq_ignore_ascii_case("desc") {
      Ok(Self::Desc)
    } else {
      Err(Error::InvalidDirection(s.to_owned()))
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Asc => "ASC",
      Self::Desc => "DESC",
    })
  }
}

/// Ordering for [`AddressBookStore::find_contacts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
  pub field:     SortField,
  pub direction: Direction,
}

// ─── Text search ─────────────────────────────────────────────────────────────

/// Where in `name` or `surname` the search text must occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
  Prefix,
  Contains,
  Suffix,
}

impl MatchMode {
  pub const ALL: [MatchMode; 3] = [Self::Prefix, Self::Contains, Self::Suffix];
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Libreta store backend.
///
/// Every method is a single atomic unit of work: all reads and writes it
/// performs commit or roll back together. Contact reads only ever see live
/// contacts; soft-deleted rows are invisible through this trait.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AddressBookStore: Send + Sync {
  type Error: Classify + std::error::Error + Send + Sync + 'static;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Retrieve a live contact, with its phones. Returns `None` if absent or
  /// deleted.
  fn find_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// List all live contacts, with their phones, optionally ordered.
  fn find_contacts(
    &self,
    sort: Option<Sort>,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Insert a new contact. The id is assigned by the store.
  fn insert_contact(
    &self,
    draft: ContactDraft,
    created_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Overwrite `name` and `surname` of contact `id`, or insert it under that
  /// id if no row exists. `created_at` of an existing row is preserved.
  ///
  /// Fails with a duplicate-key error if `id` belongs to a deleted contact.
  fn upsert_contact(
    &self,
    id: ContactId,
    draft: ContactDraft,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Load live contact `id`, compute its new contents with `merge`, write
  /// them and stamp `updated_at = at`. Returns `None` without writing
  /// anything if the contact does not exist.
  fn update_contact<F>(
    &self,
    id: ContactId,
    at: DateTime<Utc>,
    merge: F,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_
  where
    F: FnOnce(&Contact) -> ContactDraft + Send + 'static;

  /// Soft-delete live contact `id` and remove every phone it owns. Returns the
  /// contact as it was before deletion, or `None` if it was not found.
  fn delete_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Live contacts whose name or surname matches `text`, once per entry of
  /// `modes`, all read in one transaction. Hits are concatenated in `modes`
  /// order, so a contact matching several modes appears several times.
  fn search_contacts<'a>(
    &'a self,
    text: &'a str,
    modes: &'a [MatchMode],
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  // ── Phones ────────────────────────────────────────────────────────────

  fn find_phone(
    &self,
    id: PhoneId,
  ) -> impl Future<Output = Result<Option<Phone>, Self::Error>> + Send + '_;

  /// All phones owned by live contact `contact`, in insertion order, or
  /// `None` if there is no such contact.
  fn find_phones_by_contact(
    &self,
    contact: ContactId,
  ) -> impl Future<Output = Result<Option<Vec<Phone>>, Self::Error>> + Send + '_;

  /// Insert a new phone. The owning contact must exist and be live.
  fn insert_phone(
    &self,
    draft: PhoneDraft,
    created_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Phone, Self::Error>> + Send + '_;

  /// Overwrite the number of phone `id`, or insert it under that id if no
  /// row exists. An existing phone keeps its owning contact.
  fn upsert_phone(
    &self,
    id: PhoneId,
    draft: PhoneDraft,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Phone, Self::Error>> + Send + '_;

  /// Load phone `id`, compute its new number with `merge`, write it and
  /// stamp `updated_at = at`. Returns `None` if the phone does not exist.
  fn update_phone<F>(
    &self,
    id: PhoneId,
    at: DateTime<Utc>,
    merge: F,
  ) -> impl Future<Output = Result<Option<Phone>, Self::Error>> + Send + '_
  where
    F: FnOnce(&Phone) -> Option<String> + Send + 'static;

  /// Hard-delete phone `id`, returning it as it was, or `None` if absent.
  fn delete_phone(
    &self,
    id: PhoneId,
  ) -> impl Future<Output = Result<Option<Phone>, Self::Error>> + Send + '_;
}
