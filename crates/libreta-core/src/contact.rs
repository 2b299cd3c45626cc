//! A person in the address book, together with the phones it owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phone::Phone;

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// Upper bound on the length of `name` and `surname`, enforced by the store.
pub const MAX_NAME_LEN: usize = 100;

/// A live (non-deleted) contact as read back from the store.
///
/// Soft-deleted contacts are never materialised as a `Contact`; the deleted
/// flag is a storage concern only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:         ContactId,
  pub name:       String,
  pub surname:    String,
  /// Server-assigned on creation; never changes afterwards.
  pub created_at: DateTime<Utc>,
  /// Re-stamped on every update. `None` until the first update.
  pub updated_at: Option<DateTime<Utc>>,
  /// Owned phones, loaded eagerly with the contact.
  #[serde(default)]
  pub phones:     Vec<Phone>,
}

/// The client-controlled part of a contact: the input to create, replace and
/// patch operations.
///
/// Fields are optional so that a missing value reaches the store and is
/// reported as a constraint violation, rather than being rejected earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
  pub name:    Option<String>,
  pub surname: Option<String>,
}

impl ContactDraft {
  pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
    Self {
      name:    Some(name.into()),
      surname: Some(surname.into()),
    }
  }
}

impl From<&Contact> for ContactDraft {
  fn from(c: &Contact) -> Self {
    Self {
      name:    Some(c.name.clone()),
      surname: Some(c.surname.clone()),
    }
  }
}
