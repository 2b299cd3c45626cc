//! [`SqliteStore`], the SQLite implementation of [`AddressBookStore`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, Utc};
use rusqlite::{
  Connection, OptionalExtension as _, ffi, params, params_from_iter,
};

use libreta_core::{
  contact::{Contact, ContactDraft, ContactId},
  phone::{Phone, PhoneDraft, PhoneId},
  store::{AddressBookStore, MatchMode, Sort},
};

use crate::{
  Result,
  encode::{
    CONTACT_COLUMNS, PHONE_COLUMNS, contact_from_row, encode_dt, like_pattern,
    phone_from_row, sort_column,
  },
  error::constraint_failure,
  schema::schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Libreta address book backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(&schema())?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────
//
// These run inside a connection closure, usually on an open transaction
// (which derefs to `Connection`).

fn load_phones_by_contact(
  conn: &Connection,
  contact_id: ContactId,
) -> rusqlite::Result<Vec<Phone>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {PHONE_COLUMNS} FROM phones WHERE contact_id = ?1 ORDER BY id"
  ))?;
  let phones = stmt
    .query_map(params![contact_id], phone_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(phones)
}

/// Most contact ids bound into one `IN (...)` list.
const IN_CHUNK: usize = 500;

/// Fill in `phones` for every contact in `contacts`, reading only the phones
/// of those contacts. `contacts` may hold the same contact more than once.
fn attach_phones(
  conn: &Connection,
  contacts: &mut [Contact],
) -> rusqlite::Result<()> {
  let mut ids: Vec<ContactId> = contacts.iter().map(|c| c.id).collect();
  ids.sort_unstable();
  ids.dedup();

  let mut by_contact: HashMap<ContactId, Vec<Phone>> = HashMap::new();
  for chunk in ids.chunks(IN_CHUNK) {
    let placeholders = vec!["?"; chunk.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
      "SELECT {PHONE_COLUMNS} FROM phones
       WHERE contact_id IN ({placeholders})
       ORDER BY id"
    ))?;
    for phone in stmt.query_map(params_from_iter(chunk), phone_from_row)? {
      let phone = phone?;
      by_contact.entry(phone.contact_id).or_default().push(phone);
    }
  }

  for contact in contacts {
    contact.phones = by_contact.get(&contact.id).cloned().unwrap_or_default();
  }
  Ok(())
}

/// Run a `SELECT {CONTACT_COLUMNS} ...` query and attach phones.
fn query_contacts(
  conn: &Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Contact>> {
  let mut contacts = {
    let mut stmt = conn.prepare(sql)?;
    stmt
      .query_map(params, contact_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };
  attach_phones(conn, &mut contacts)?;
  Ok(contacts)
}

fn load_contact(
  conn: &Connection,
  id: ContactId,
) -> rusqlite::Result<Option<Contact>> {
  let contact = conn
    .query_row(
      &format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1 AND deleted = 0"
      ),
      params![id],
      contact_from_row,
    )
    .optional()?;

  match contact {
    Some(mut c) => {
      c.phones = load_phones_by_contact(conn, c.id)?;
      Ok(Some(c))
    }
    None => Ok(None),
  }
}

/// Load a contact that was written in the current transaction.
fn require_contact(conn: &Connection, id: ContactId) -> rusqlite::Result<Contact> {
  load_contact(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

fn load_phone(conn: &Connection, id: PhoneId) -> rusqlite::Result<Option<Phone>> {
  conn
    .query_row(
      &format!("SELECT {PHONE_COLUMNS} FROM phones WHERE id = ?1"),
      params![id],
      phone_from_row,
    )
    .optional()
}

fn require_phone(conn: &Connection, id: PhoneId) -> rusqlite::Result<Phone> {
  load_phone(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// `Some(deleted)` if a contact row with `id` exists at all.
fn contact_row_state(
  conn: &Connection,
  id: ContactId,
) -> rusqlite::Result<Option<bool>> {
  conn
    .query_row(
      "SELECT deleted FROM contacts WHERE id = ?1",
      params![id],
      |r| r.get(0),
    )
    .optional()
}

/// A soft-deleted contact still satisfies the SQL foreign key, so reject it
/// here with the same error SQLite raises for a missing parent.
fn ensure_owner_live(
  conn: &Connection,
  contact: Option<ContactId>,
) -> rusqlite::Result<()> {
  let Some(id) = contact else {
    return Ok(());
  };
  if contact_row_state(conn, id)? == Some(true) {
    return Err(constraint_failure(
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
      format!("FOREIGN KEY constraint failed: contact {id} has been deleted"),
    ));
  }
  Ok(())
}

// ─── AddressBookStore impl ───────────────────────────────────────────────────

impl AddressBookStore for SqliteStore {
  type Error = crate::Error;

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn find_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    let contact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contact = load_contact(&tx, id)?;
        tx.commit()?;
        Ok(contact)
      })
      .await?;
    Ok(contact)
  }

  async fn find_contacts(&self, sort: Option<Sort>) -> Result<Vec<Contact>> {
    let order_by = match sort {
      Some(Sort { field, direction }) => {
        format!("{} {direction}, id ASC", sort_column(field))
      }
      None => "id ASC".to_owned(),
    };

    let contacts = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contacts = query_contacts(
          &tx,
          &format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE deleted = 0
             ORDER BY {order_by}"
          ),
          [],
        )?;
        tx.commit()?;
        Ok(contacts)
      })
      .await?;
    Ok(contacts)
  }

  async fn insert_contact(
    &self,
    draft: ContactDraft,
    created_at: DateTime<Utc>,
  ) -> Result<Contact> {
    let at_str = encode_dt(created_at);

    let contact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO contacts (name, surname, created_at) VALUES (?1, ?2, ?3)",
          params![draft.name, draft.surname, at_str],
        )?;
        let contact = require_contact(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(contact)
      })
      .await?;
    Ok(contact)
  }

  async fn upsert_contact(
    &self,
    id: ContactId,
    draft: ContactDraft,
    at: DateTime<Utc>,
  ) -> Result<Contact> {
    let at_str = encode_dt(at);

    let contact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match contact_row_state(&tx, id)? {
          Some(true) => {
            return Err(
              constraint_failure(
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
                format!("UNIQUE constraint failed: contact {id} has been deleted"),
              )
              .into(),
            );
          }
          Some(false) => {
            tx.execute(
              "UPDATE contacts SET name = ?2, surname = ?3, updated_at = ?4
               WHERE id = ?1",
              params![id, draft.name, draft.surname, at_str],
            )?;
          }
          None => {
            tx.execute(
              "INSERT INTO contacts (id, name, surname, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?4)",
              params![id, draft.name, draft.surname, at_str],
            )?;
          }
        }
        let contact = require_contact(&tx, id)?;
        tx.commit()?;
        Ok(contact)
      })
      .await?;
    Ok(contact)
  }

  async fn update_contact<F>(
    &self,
    id: ContactId,
    at: DateTime<Utc>,
    merge: F,
  ) -> Result<Option<Contact>>
  where
    F: FnOnce(&Contact) -> ContactDraft + Send + 'static,
  {
    let at_str = encode_dt(at);

    let contact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(current) = load_contact(&tx, id)? else {
          return Ok(None);
        };
        let merged = merge(&current);
        tx.execute(
          "UPDATE contacts SET name = ?2, surname = ?3, updated_at = ?4
           WHERE id = ?1",
          params![id, merged.name, merged.surname, at_str],
        )?;
        let contact = require_contact(&tx, id)?;
        tx.commit()?;
        Ok(Some(contact))
      })
      .await?;
    Ok(contact)
  }

  async fn delete_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    let contact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(contact) = load_contact(&tx, id)? else {
          return Ok(None);
        };
        tx.execute("DELETE FROM phones WHERE contact_id = ?1", params![id])?;
        tx.execute("UPDATE contacts SET deleted = 1 WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Some(contact))
      })
      .await?;
    Ok(contact)
  }

  async fn search_contacts(
    &self,
    text: &str,
    modes: &[MatchMode],
  ) -> Result<Vec<Contact>> {
    let patterns: Vec<String> =
      modes.iter().map(|&mode| like_pattern(text, mode)).collect();

    let contacts = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut contacts = Vec::new();
        {
          let mut stmt = tx.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE deleted = 0
               AND (name LIKE ?1 ESCAPE '\\' OR surname LIKE ?1 ESCAPE '\\')
             ORDER BY id"
          ))?;
          for pattern in &patterns {
            let hits = stmt
              .query_map(params![pattern], contact_from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            contacts.extend(hits);
          }
        }
        attach_phones(&tx, &mut contacts)?;
        tx.commit()?;
        Ok(contacts)
      })
      .await?;
    Ok(contacts)
  }

  // ── Phones ────────────────────────────────────────────────────────────────

  async fn find_phone(&self, id: PhoneId) -> Result<Option<Phone>> {
    let phone = self
      .conn
      .call(move |conn| Ok(load_phone(conn, id)?))
      .await?;
    Ok(phone)
  }

  async fn find_phones_by_contact(
    &self,
    contact: ContactId,
  ) -> Result<Option<Vec<Phone>>> {
    let phones = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let phones = match contact_row_state(&tx, contact)? {
          Some(false) => Some(load_phones_by_contact(&tx, contact)?),
          _ => None,
        };
        tx.commit()?;
        Ok(phones)
      })
      .await?;
    Ok(phones)
  }

  async fn insert_phone(
    &self,
    draft: PhoneDraft,
    created_at: DateTime<Utc>,
  ) -> Result<Phone> {
    let at_str = encode_dt(created_at);

    let phone = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        ensure_owner_live(&tx, draft.contact)?;
        tx.execute(
          "INSERT INTO phones (contact_id, number, created_at) VALUES (?1, ?2, ?3)",
          params![draft.contact, draft.number, at_str],
        )?;
        let phone = require_phone(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(phone)
      })
      .await?;
    Ok(phone)
  }

  async fn upsert_phone(
    &self,
    id: PhoneId,
    draft: PhoneDraft,
    at: DateTime<Utc>,
  ) -> Result<Phone> {
    let at_str = encode_dt(at);

    let phone = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if load_phone(&tx, id)?.is_some() {
          tx.execute(
            "UPDATE phones SET number = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, draft.number, at_str],
          )?;
        } else {
          ensure_owner_live(&tx, draft.contact)?;
          tx.execute(
            "INSERT INTO phones (id, contact_id, number, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, draft.contact, draft.number, at_str],
          )?;
        }
        let phone = require_phone(&tx, id)?;
        tx.commit()?;
        Ok(phone)
      })
      .await?;
    Ok(phone)
  }

  async fn update_phone<F>(
    &self,
    id: PhoneId,
    at: DateTime<Utc>,
    merge: F,
  ) -> Result<Option<Phone>>
  where
    F: FnOnce(&Phone) -> Option<String> + Send + 'static,
  {
    let at_str = encode_dt(at);

    let phone = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(current) = load_phone(&tx, id)? else {
          return Ok(None);
        };
        let number = merge(&current);
        tx.execute(
          "UPDATE phones SET number = ?2, updated_at = ?3 WHERE id = ?1",
          params![id, number, at_str],
        )?;
        let phone = require_phone(&tx, id)?;
        tx.commit()?;
        Ok(Some(phone))
      })
      .await?;
    Ok(phone)
  }

  async fn delete_phone(&self, id: PhoneId) -> Result<Option<Phone>> {
    let phone = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(phone) = load_phone(&tx, id)? else {
          return Ok(None);
        };
        tx.execute("DELETE FROM phones WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Some(phone))
      })
      .await?;
    Ok(phone)
  }
}
