//! # tuckshop-store
//!
//! Document store for the tuck shop, backed by SQLite.
//!
//! Documents are schemaless JSON objects grouped into named collections
//! (`items`, `offers`, `purchases`). The crate exposes a synchronous
//! [`Database`] handle, a generic [`Collection`] API (add / get / stream /
//! filter / merge-update / delete) and typed helpers for every domain model.

pub mod collection;
pub mod database;
pub mod items;
pub mod migrations;
pub mod models;
pub mod offers;
pub mod purchases;

mod error;

pub use collection::{Collection, Document, Filter, FilterOp};
pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
