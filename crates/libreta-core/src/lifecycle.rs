//! Contact and phone lifecycle: creation, full and partial update, deletion.
//!
//! The services own the timestamps. `created_at` is stamped once on creation
//! and `updated_at` on every update; any timestamps or ids a client sends are
//! never consulted. Store failures are classified exactly once, here.

use std::sync::Arc;

use chrono::Utc;

use crate::{
  Result,
  contact::{Contact, ContactDraft, ContactId},
  error::Error,
  phone::{Phone, PhoneDraft, PhoneId},
  search,
  store::{AddressBookStore, Direction, Sort, SortField},
};

// ─── Patch outcome ───────────────────────────────────────────────────────────

/// Result of a load-then-patch operation.
///
/// A patch aimed at a record that does not exist is not an error; it simply
/// writes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome<T> {
  Updated(T),
  NotFound,
}

impl<T> PatchOutcome<T> {
  pub fn is_updated(&self) -> bool { matches!(self, Self::Updated(_)) }

  pub fn updated(self) -> Option<T> {
    match self {
      Self::Updated(t) => Some(t),
      Self::NotFound => None,
    }
  }
}

impl<T> From<Option<T>> for PatchOutcome<T> {
  fn from(o: Option<T>) -> Self {
    match o {
      Some(t) => Self::Updated(t),
      None => Self::NotFound,
    }
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// Owns the lifecycle of [`Contact`] records.
pub struct ContactService<S> {
  store: Arc<S>,
}

impl<S> Clone for ContactService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: AddressBookStore> ContactService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Every live contact, phones attached, in store order.
  pub async fn list_all(&self) -> Result<Vec<Contact>> {
    self.store.find_contacts(None).await.map_err(Error::from_store)
  }

  /// Every live contact ordered by `field`. Fails with
  /// [`Error::InvalidField`] if `field` is not a contact field.
  pub async fn list_sorted(
    &self,
    field: &str,
    direction: Direction,
  ) -> Result<Vec<Contact>> {
    let field: SortField = field.parse()?;
    self
      .store
      .find_contacts(Some(Sort { field, direction }))
      .await
      .map_err(Error::from_store)
  }

  pub async fn get(&self, id: ContactId) -> Result<Option<Contact>> {
    self.store.find_contact(id).await.map_err(Error::from_store)
  }

  /// The phones of live contact `id`, or `None` if there is no such contact.
  pub async fn phones(&self, id: ContactId) -> Result<Option<Vec<Phone>>> {
    self
      .store
      .find_phones_by_contact(id)
      .await
      .map_err(Error::from_store)
  }

  pub async fn create(&self, draft: ContactDraft) -> Result<Contact> {
    let contact = self
      .store
      .insert_contact(draft, Utc::now())
      .await
      .map_err(Error::from_store)?;
    tracing::debug!(id = contact.id, "contact created");
    Ok(contact)
  }

  /// Full overwrite of contact `id`. Writes whether or not the contact
  /// existed before; the id in the path always wins.
  pub async fn replace(
    &self,
    id: ContactId,
    draft: ContactDraft,
  ) -> Result<Contact> {
    self
      .store
      .upsert_contact(id, draft, Utc::now())
      .await
      .map_err(Error::from_store)
  }

  /// Replace only the name of contact `id`.
  pub async fn patch_name(
    &self,
    id: ContactId,
    draft: ContactDraft,
  ) -> Result<PatchOutcome<Contact>> {
    let name = draft.name;
    self
      .patch(id, move |current| ContactDraft {
        name,
        ..ContactDraft::from(current)
      })
      .await
  }

  /// Replace only the surname of contact `id`.
  pub async fn patch_surname(
    &self,
    id: ContactId,
    draft: ContactDraft,
  ) -> Result<PatchOutcome<Contact>> {
    let surname = draft.surname;
    self
      .patch(id, move |current| ContactDraft {
        surname,
        ..ContactDraft::from(current)
      })
      .await
  }

  async fn patch<F>(
    &self,
    id: ContactId,
    merge: F,
  ) -> Result<PatchOutcome<Contact>>
  where
    F: FnOnce(&Contact) -> ContactDraft + Send + 'static,
  {
    let outcome: PatchOutcome<Contact> = self
      .store
      .update_contact(id, Utc::now(), merge)
      .await
      .map_err(Error::from_store)?
      .into();
    if !outcome.is_updated() {
      tracing::debug!(id, "patch target not found, nothing written");
    }
    Ok(outcome)
  }

  /// Delete contact `id` and every phone it owns. Returns the contact as it
  /// was before deletion, or `None` if it did not exist.
  pub async fn delete(&self, id: ContactId) -> Result<Option<Contact>> {
    let deleted = self
      .store
      .delete_contact(id)
      .await
      .map_err(Error::from_store)?;
    if let Some(c) = &deleted {
      tracing::debug!(id, phones = c.phones.len(), "contact deleted");
    }
    Ok(deleted)
  }

  /// See [`search::search`].
  pub async fn search(&self, text: &str) -> Result<Vec<Contact>> {
    search::search(self.store.as_ref(), text).await
  }
}

// ─── Phones ──────────────────────────────────────────────────────────────────

/// Owns the lifecycle of [`Phone`] records.
pub struct PhoneService<S> {
  store: Arc<S>,
}

impl<S> Clone for PhoneService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: AddressBookStore> PhoneService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn get(&self, id: PhoneId) -> Result<Option<Phone>> {
    self.store.find_phone(id).await.map_err(Error::from_store)
  }

  /// Create a phone for `draft.contact`, which must be an existing contact.
  pub async fn create(&self, draft: PhoneDraft) -> Result<Phone> {
    let phone = self
      .store
      .insert_phone(draft, Utc::now())
      .await
      .map_err(Error::from_store)?;
    tracing::debug!(id = phone.id, contact = phone.contact_id, "phone created");
    Ok(phone)
  }

  /// Full overwrite of phone `id`; inserts it if absent.
  pub async fn replace(&self, id: PhoneId, draft: PhoneDraft) -> Result<Phone> {
    self
      .store
      .upsert_phone(id, draft, Utc::now())
      .await
      .map_err(Error::from_store)
  }

  /// Replace only the number of phone `id`.
  pub async fn patch_number(
    &self,
    id: PhoneId,
    draft: PhoneDraft,
  ) -> Result<PatchOutcome<Phone>> {
    let number = draft.number;
    let outcome: PatchOutcome<Phone> = self
      .store
      .update_phone(id, Utc::now(), move |_| number)
      .await
      .map_err(Error::from_store)?
      .into();
    if !outcome.is_updated() {
      tracing::debug!(id, "patch target not found, nothing written");
    }
    Ok(outcome)
  }

  pub async fn delete(&self, id: PhoneId) -> Result<Option<Phone>> {
    self.store.delete_phone(id).await.map_err(Error::from_store)
  }
}
