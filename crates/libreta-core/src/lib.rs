//! Core types, the store abstraction and the business rules of the Libreta
//! address book.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`libreta-store-sqlite`) implements [`store::AddressBookStore`]
//! and the JSON API (`libreta-api`) drives the services defined here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod lifecycle;
pub mod phone;
pub mod search;
pub mod store;

pub use error::{Error, Result};
