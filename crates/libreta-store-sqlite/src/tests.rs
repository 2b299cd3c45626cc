//! Integration tests for `SqliteStore` and the core services driven over it,
//! against an in-memory database.

use std::sync::Arc;

use chrono::Utc;
use libreta_core::{
  Error,
  contact::ContactDraft,
  error::ConstraintKind,
  lifecycle::{ContactService, PatchOutcome, PhoneService},
  phone::PhoneDraft,
  store::{AddressBookStore, Direction, MatchMode},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn services() -> (ContactService<SqliteStore>, PhoneService<SqliteStore>) {
  let s = Arc::new(store().await);
  (ContactService::new(s.clone()), PhoneService::new(s))
}

fn names(contacts: &[libreta_core::contact::Contact]) -> Vec<&str> {
  contacts.iter().map(|c| c.name.as_str()).collect()
}

// ─── Store: contacts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_contact() {
  let s = store().await;

  let created = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  assert!(created.id > 0);
  assert!(created.updated_at.is_none());
  assert!(created.phones.is_empty());

  let fetched = s.find_contact(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn find_contact_missing_returns_none() {
  let s = store().await;
  assert!(s.find_contact(42).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_name_is_other_constraint() {
  let s = store().await;
  let err = s
    .insert_contact(
      ContactDraft {
        name:    None,
        surname: Some("Lopez".into()),
      },
      Utc::now(),
    )
    .await
    .unwrap_err();
  assert_eq!(
    Error::from_store(err).constraint_kind(),
    Some(ConstraintKind::Other)
  );
}

#[tokio::test]
async fn overlong_surname_is_rejected() {
  let s = store().await;
  let err = s
    .insert_contact(ContactDraft::new("Ana", "x".repeat(101)), Utc::now())
    .await
    .unwrap_err();
  assert_eq!(
    Error::from_store(err).constraint_kind(),
    Some(ConstraintKind::Other)
  );
}

#[tokio::test]
async fn blank_name_or_surname_is_rejected() {
  let s = store().await;
  for (name, surname) in [("   ", "Lopez"), ("Ana", " "), ("", "Lopez")] {
    let err = s
      .insert_contact(ContactDraft::new(name, surname), Utc::now())
      .await
      .unwrap_err();
    assert_eq!(
      Error::from_store(err).constraint_kind(),
      Some(ConstraintKind::Other),
      "{name:?} {surname:?}"
    );
  }
  assert!(s.find_contacts(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_name_cannot_be_patched_in() {
  let (contacts, _) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  let err = contacts
    .patch_name(ana.id, ContactDraft::new("  ", "ignored"))
    .await
    .unwrap_err();
  assert_eq!(err.constraint_kind(), Some(ConstraintKind::Other));
  let still = contacts.get(ana.id).await.unwrap().unwrap();
  assert_eq!(still.name, "Ana");
}

#[tokio::test]
async fn search_modes_are_positional() {
  let s = store().await;
  s.insert_contact(ContactDraft::new("Andrea", "Ruiz"), Utc::now())
    .await
    .unwrap();
  s.insert_contact(ContactDraft::new("Juan", "Diaz"), Utc::now())
    .await
    .unwrap();
  s.insert_contact(ContactDraft::new("Marta", "Sanchez"), Utc::now())
    .await
    .unwrap();

  let prefix = s.search_contacts("an", &[MatchMode::Prefix]).await.unwrap();
  assert_eq!(names(&prefix), ["Andrea"]);

  let suffix = s.search_contacts("an", &[MatchMode::Suffix]).await.unwrap();
  assert_eq!(names(&suffix), ["Juan"]);

  let contains = s.search_contacts("an", &[MatchMode::Contains]).await.unwrap();
  assert_eq!(names(&contains), ["Andrea", "Juan", "Marta"]);
}

#[tokio::test]
async fn search_several_modes_in_one_call() {
  let s = store().await;
  let andrea = s
    .insert_contact(ContactDraft::new("Andrea", "Ruiz"), Utc::now())
    .await
    .unwrap();
  let juan = s
    .insert_contact(ContactDraft::new("Juan", "Diaz"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(andrea.id, "555-0100"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(juan.id, "555-0200"), Utc::now())
    .await
    .unwrap();

  // Hits come back mode by mode; a contact matching twice is listed twice.
  let hits = s.search_contacts("an", &MatchMode::ALL).await.unwrap();
  assert_eq!(names(&hits), ["Andrea", "Andrea", "Juan", "Juan"]);

  // Every copy carries its own contact's phones and nobody else's.
  for hit in &hits {
    assert_eq!(hit.phones.len(), 1);
    assert_eq!(hit.phones[0].contact_id, hit.id);
  }
}

#[tokio::test]
async fn search_attaches_only_matching_contacts_phones() {
  let s = store().await;
  let ana = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  let marta = s
    .insert_contact(ContactDraft::new("Marta", "Gomez"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(ana.id, "555-0100"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(marta.id, "555-0300"), Utc::now())
    .await
    .unwrap();

  let hits = s
    .search_contacts("Gom", &[MatchMode::Prefix])
    .await
    .unwrap();
  assert_eq!(names(&hits), ["Marta"]);
  let numbers: Vec<_> =
    hits[0].phones.iter().map(|p| p.number.as_str()).collect();
  assert_eq!(numbers, ["555-0300"]);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();

  let hits = s.search_contacts("%", &[MatchMode::Contains]).await.unwrap();
  assert!(hits.is_empty());
  let hits = s.search_contacts("_na", &[MatchMode::Prefix]).await.unwrap();
  assert!(hits.is_empty());
}

// ─── Store: phones ───────────────────────────────────────────────────────────

#[tokio::test]
async fn phones_are_attached_to_their_contact() {
  let s = store().await;
  let ana = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  let juan = s
    .insert_contact(ContactDraft::new("Juan", "Diaz"), Utc::now())
    .await
    .unwrap();

  s.insert_phone(PhoneDraft::new(ana.id, "555-0100"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(ana.id, "555-0101"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(juan.id, "555-0200"), Utc::now())
    .await
    .unwrap();

  let ana = s.find_contact(ana.id).await.unwrap().unwrap();
  let numbers: Vec<_> = ana.phones.iter().map(|p| p.number.as_str()).collect();
  assert_eq!(numbers, ["555-0100", "555-0101"]);

  let all = s.find_contacts(None).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[1].phones.len(), 1);
  assert_eq!(all[1].phones[0].contact_id, juan.id);

  let by_contact = s.find_phones_by_contact(juan.id).await.unwrap().unwrap();
  assert_eq!(by_contact.len(), 1);
}

#[tokio::test]
async fn phones_of_missing_or_deleted_contact_is_none() {
  let s = store().await;
  assert!(s.find_phones_by_contact(7).await.unwrap().is_none());

  let ana = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  assert_eq!(s.find_phones_by_contact(ana.id).await.unwrap(), Some(vec![]));

  s.delete_contact(ana.id).await.unwrap();
  assert!(s.find_phones_by_contact(ana.id).await.unwrap().is_none());
}

#[tokio::test]
async fn blank_number_is_rejected() {
  let s = store().await;
  let ana = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  let err = s
    .insert_phone(PhoneDraft::new(ana.id, "   "), Utc::now())
    .await
    .unwrap_err();
  assert_eq!(
    Error::from_store(err).constraint_kind(),
    Some(ConstraintKind::Other)
  );
}

#[tokio::test]
async fn same_number_twice_for_a_contact_is_duplicate_key() {
  let s = store().await;
  let ana = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  s.insert_phone(PhoneDraft::new(ana.id, "555-0100"), Utc::now())
    .await
    .unwrap();

  let err = s
    .insert_phone(PhoneDraft::new(ana.id, "555-0100"), Utc::now())
    .await
    .unwrap_err();
  assert_eq!(
    Error::from_store(err).constraint_kind(),
    Some(ConstraintKind::DuplicateKey)
  );
}

#[tokio::test]
async fn overlong_number_is_rejected() {
  let s = store().await;
  let ana = s
    .insert_contact(ContactDraft::new("Ana", "Lopez"), Utc::now())
    .await
    .unwrap();
  let err = s
    .insert_phone(PhoneDraft::new(ana.id, "9".repeat(31)), Utc::now())
    .await
    .unwrap_err();
  assert_eq!(
    Error::from_store(err).constraint_kind(),
    Some(ConstraintKind::Other)
  );
}

// ─── ContactService ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_stamps_created_at_within_call_window() {
  let (contacts, _) = services().await;

  // Stored timestamps carry microsecond precision.
  let before = Utc::now() - chrono::Duration::microseconds(1);
  let created = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  let after = Utc::now();

  let fetched = contacts.get(created.id).await.unwrap().unwrap();
  assert!(fetched.id > 0);
  assert!(fetched.created_at >= before && fetched.created_at <= after);
  assert_eq!(fetched.name, "Ana");
  assert_eq!(fetched.surname, "Lopez");
}

#[tokio::test]
async fn list_sorted_by_name() {
  let (contacts, _) = services().await;
  for (name, surname) in [("Marta", "Gomez"), ("Ana", "Lopez"), ("Juan", "Diaz")] {
    contacts
      .create(ContactDraft::new(name, surname))
      .await
      .unwrap();
  }

  let asc = contacts.list_sorted("nombre", Direction::Asc).await.unwrap();
  assert_eq!(names(&asc), ["Ana", "Juan", "Marta"]);

  let desc = contacts.list_sorted("name", Direction::Desc).await.unwrap();
  assert_eq!(names(&desc), ["Marta", "Juan", "Ana"]);

  let by_surname = contacts
    .list_sorted("apellido", Direction::Asc)
    .await
    .unwrap();
  assert_eq!(names(&by_surname), ["Juan", "Marta", "Ana"]);
}

#[tokio::test]
async fn list_sorted_rejects_unknown_field() {
  let (contacts, _) = services().await;
  let err = contacts
    .list_sorted("telefono", Direction::Asc)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidField(f) if f == "telefono"));
}

#[tokio::test]
async fn replace_overwrites_and_keeps_created_at() {
  let (contacts, _) = services().await;
  let created = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();

  let replaced = contacts
    .replace(created.id, ContactDraft::new("Ana Maria", "Lopez Vega"))
    .await
    .unwrap();
  assert_eq!(replaced.id, created.id);
  assert_eq!(replaced.name, "Ana Maria");
  assert_eq!(replaced.surname, "Lopez Vega");
  assert_eq!(replaced.created_at, created.created_at);
  assert!(replaced.updated_at.is_some());
}

#[tokio::test]
async fn replace_missing_id_inserts_under_that_id() {
  let (contacts, _) = services().await;
  let replaced = contacts
    .replace(77, ContactDraft::new("Juan", "Diaz"))
    .await
    .unwrap();
  assert_eq!(replaced.id, 77);
  assert_eq!(contacts.get(77).await.unwrap().unwrap().name, "Juan");
}

#[tokio::test]
async fn replace_deleted_contact_is_duplicate_key() {
  let (contacts, _) = services().await;
  let created = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  contacts.delete(created.id).await.unwrap();

  let err = contacts
    .replace(created.id, ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap_err();
  assert_eq!(err.constraint_kind(), Some(ConstraintKind::DuplicateKey));
  assert!(contacts.get(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn patch_name_touches_only_name() {
  let (contacts, _) = services().await;
  let created = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();

  let outcome = contacts
    .patch_name(
      created.id,
      ContactDraft {
        name:    Some("Anita".into()),
        surname: Some("ignored".into()),
      },
    )
    .await
    .unwrap();
  let patched = outcome.updated().expect("contact exists");
  assert_eq!(patched.name, "Anita");
  assert_eq!(patched.surname, "Lopez");
  assert_eq!(patched.created_at, created.created_at);
  assert!(patched.updated_at.is_some());
}

#[tokio::test]
async fn patch_surname_touches_only_surname() {
  let (contacts, _) = services().await;
  let created = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();

  let patched = contacts
    .patch_surname(
      created.id,
      ContactDraft {
        name:    None,
        surname: Some("Vega".into()),
      },
    )
    .await
    .unwrap()
    .updated()
    .unwrap();
  assert_eq!(patched.name, "Ana");
  assert_eq!(patched.surname, "Vega");
}

#[tokio::test]
async fn patch_name_on_missing_contact_is_a_no_op() {
  let (contacts, _) = services().await;

  let outcome = contacts
    .patch_name(5, ContactDraft::new("Ghost", "Nobody"))
    .await
    .unwrap();
  assert_eq!(outcome, PatchOutcome::NotFound);
  assert!(contacts.get(5).await.unwrap().is_none());
  assert!(contacts.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_contact_returns_none() {
  let (contacts, _) = services().await;
  assert!(contacts.delete(9).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_contact_hides_it_and_removes_its_phones() {
  let (contacts, phones) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  let p1 = phones.create(PhoneDraft::new(ana.id, "555-0100")).await.unwrap();
  let p2 = phones.create(PhoneDraft::new(ana.id, "555-0101")).await.unwrap();

  let deleted = contacts.delete(ana.id).await.unwrap().unwrap();
  assert_eq!(deleted.id, ana.id);
  assert_eq!(deleted.phones.len(), 2);

  assert!(contacts.get(ana.id).await.unwrap().is_none());
  assert!(contacts.list_all().await.unwrap().is_empty());
  assert!(contacts.search("Ana").await.unwrap().is_empty());
  assert!(contacts.phones(ana.id).await.unwrap().is_none());
  assert!(phones.get(p1.id).await.unwrap().is_none());
  assert!(phones.get(p2.id).await.unwrap().is_none());

  // Deleting again finds nothing.
  assert!(contacts.delete(ana.id).await.unwrap().is_none());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_unions_and_deduplicates() {
  let (contacts, _) = services().await;
  for (name, surname) in [("Ana", "Lopez"), ("Juan", "Diaz"), ("Marta", "Gomez")] {
    contacts
      .create(ContactDraft::new(name, surname))
      .await
      .unwrap();
  }

  // "Ana" matches as prefix and contains; it must still appear once.
  let hits = contacts.search("an").await.unwrap();
  assert_eq!(names(&hits), ["Ana", "Juan"]);
}

#[tokio::test]
async fn search_contains_matches_inside_surname() {
  let (contacts, _) = services().await;
  for (name, surname) in [("Ana", "Lopez"), ("Juan", "Diaz"), ("Marta", "Fernandez")] {
    contacts
      .create(ContactDraft::new(name, surname))
      .await
      .unwrap();
  }

  // "Fernandez" contains "an", so Marta is a hit too.
  let hits = contacts.search("an").await.unwrap();
  assert_eq!(names(&hits), ["Ana", "Juan", "Marta"]);
}

#[tokio::test]
async fn search_empty_text_matches_everyone() {
  let (contacts, _) = services().await;
  contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  contacts
    .create(ContactDraft::new("Juan", "Diaz"))
    .await
    .unwrap();

  assert_eq!(contacts.search("").await.unwrap().len(), 2);
}

// ─── PhoneService ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_phone_for_missing_contact_is_foreign_key_violation() {
  let (_, phones) = services().await;
  let err = phones
    .create(PhoneDraft::new(404, "555-0100"))
    .await
    .unwrap_err();
  assert_eq!(
    err.constraint_kind(),
    Some(ConstraintKind::ForeignKeyViolation)
  );
}

#[tokio::test]
async fn create_phone_for_deleted_contact_is_foreign_key_violation() {
  let (contacts, phones) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  contacts.delete(ana.id).await.unwrap();

  let err = phones
    .create(PhoneDraft::new(ana.id, "555-0100"))
    .await
    .unwrap_err();
  assert_eq!(
    err.constraint_kind(),
    Some(ConstraintKind::ForeignKeyViolation)
  );
}

#[tokio::test]
async fn replace_phone_keeps_owner() {
  let (contacts, phones) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  let juan = contacts
    .create(ContactDraft::new("Juan", "Diaz"))
    .await
    .unwrap();
  let phone = phones.create(PhoneDraft::new(ana.id, "555-0100")).await.unwrap();

  let replaced = phones
    .replace(phone.id, PhoneDraft::new(juan.id, "555-0199"))
    .await
    .unwrap();
  assert_eq!(replaced.id, phone.id);
  assert_eq!(replaced.contact_id, ana.id);
  assert_eq!(replaced.number, "555-0199");
  assert_eq!(replaced.created_at, phone.created_at);
  assert!(replaced.updated_at.is_some());
}

#[tokio::test]
async fn replace_missing_phone_inserts_it() {
  let (contacts, phones) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();

  let phone = phones
    .replace(31, PhoneDraft::new(ana.id, "555-0131"))
    .await
    .unwrap();
  assert_eq!(phone.id, 31);
  assert_eq!(contacts.phones(ana.id).await.unwrap().unwrap().len(), 1);
}

#[tokio::test]
async fn patch_number_updates_or_reports_not_found() {
  let (contacts, phones) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  let phone = phones.create(PhoneDraft::new(ana.id, "555-0100")).await.unwrap();

  let patched = phones
    .patch_number(
      phone.id,
      PhoneDraft {
        number:  Some("555-0177".into()),
        contact: None,
      },
    )
    .await
    .unwrap()
    .updated()
    .unwrap();
  assert_eq!(patched.number, "555-0177");
  assert_eq!(patched.contact_id, ana.id);

  let outcome = phones
    .patch_number(phone.id + 100, PhoneDraft::new(ana.id, "555-0000"))
    .await
    .unwrap();
  assert_eq!(outcome, PatchOutcome::NotFound);
  assert!(phones.get(phone.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_phone_returns_it_once() {
  let (contacts, phones) = services().await;
  let ana = contacts
    .create(ContactDraft::new("Ana", "Lopez"))
    .await
    .unwrap();
  let phone = phones.create(PhoneDraft::new(ana.id, "555-0100")).await.unwrap();

  let deleted = phones.delete(phone.id).await.unwrap().unwrap();
  assert_eq!(deleted, phone);
  assert!(phones.delete(phone.id).await.unwrap().is_none());

  let ana = contacts.get(ana.id).await.unwrap().unwrap();
  assert!(ana.phones.is_empty());
}
