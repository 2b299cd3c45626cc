//! SQLite backend for the Libreta address book.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every store operation runs in its own
//! SQLite transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result, classify};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
