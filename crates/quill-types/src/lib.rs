//! Foundation types for Quill.
//!
//! This crate provides the identity, addressing, and record types shared by
//! every other Quill crate.
//!
//! # Key Types
//!
//! - [`OwnerId`] — Public identity of the principal that owns a journal entry
//! - [`EntryAddress`] — Deterministic storage address derived from `(title, owner)`
//! - [`JournalEntry`] — Validated journal record as it exists in the remote store

pub mod address;
pub mod entry;
pub mod error;
pub mod identity;

pub use address::EntryAddress;
pub use entry::{JournalEntry, MAX_MESSAGE_LEN, MAX_TITLE_LEN};
pub use error::TypeError;
pub use identity::OwnerId;
