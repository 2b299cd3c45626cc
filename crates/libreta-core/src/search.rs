//! Free-text contact search over name and surname.

use std::collections::BTreeMap;

use crate::{
  Result,
  contact::{Contact, ContactId},
  error::Error,
  store::{AddressBookStore, MatchMode},
};

/// Live contacts whose name or surname starts with, contains, or ends with
/// `text`.
///
/// The three candidate sets are read in one store transaction, then unioned
/// and de-duplicated by contact id, so a contact matching several ways
/// appears once. The result is ordered by id; callers should not rely on any
/// particular order.
///
/// An empty `text` is contained in every string and therefore matches every
/// live contact.
pub async fn search<S>(store: &S, text: &str) -> Result<Vec<Contact>>
where
  S: AddressBookStore,
{
  let hits = store
    .search_contacts(text, &MatchMode::ALL)
    .await
    .map_err(Error::from_store)?;

  let mut found: BTreeMap<ContactId, Contact> = BTreeMap::new();
  for contact in hits {
    found.entry(contact.id).or_insert(contact);
  }

  tracing::debug!(text, hits = found.len(), "contact search");
  Ok(found.into_values().collect())
}
