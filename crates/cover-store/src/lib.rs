//! SQLite backend for the normalized coverage store.
//!
//! Dimension writes are create-if-absent; fact writes are upserts keyed on
//! each table's natural key. All writes go through a [`StoreTx`] so a file
//! load commits or rolls back as a unit.

#![deny(unsafe_code)]

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Result, StoreError};
pub use schema::SCHEMA;
pub use store::{CoverageStore, SourceFileRecord, StoreCounts, StoreTx};
