//! A phone number owned by exactly one contact for its whole lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contact::ContactId;

/// Store-assigned phone identifier.
pub type PhoneId = i64;

/// Upper bound on the length of a phone number, enforced by the store.
pub const MAX_NUMBER_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
  pub id:         PhoneId,
  /// The owning contact. Set at creation and never reassigned.
  #[serde(rename = "contact")]
  pub contact_id: ContactId,
  pub number:     String,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// Input to phone create, replace and patch operations.
///
/// `contact` is only consulted when a phone row is inserted; an existing
/// phone keeps its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneDraft {
  pub number:  Option<String>,
  pub contact: Option<ContactId>,
}

impl PhoneDraft {
  pub fn new(contact: ContactId, number: impl Into<String>) -> Self {
    Self {
      number:  Some(number.into()),
      contact: Some(contact),
    }
  }
}
