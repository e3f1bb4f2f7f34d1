//! Entry controller for Quill.
//!
//! [`EntryController`] is the client-side orchestrator for journal entries:
//! it derives storage addresses, submits signed create/update/delete
//! transactions through a [`ProgramClient`], and keeps a local cache of
//! entries that is replaced wholesale after every successful refresh. UIs
//! subscribe to cache and operation-status snapshots through `watch`
//! channels instead of polling.

pub mod controller;
pub mod error;
pub mod status;

pub use controller::{DeleteOutcome, EntryController, RESYNC_AFTER_MUTATION};
pub use error::{ClientError, ClientResult};
pub use status::{OperationKind, OperationStatus};

// Re-export key types
pub use quill_crypto::{Keypair, LocalWallet, Signature, Wallet};
pub use quill_ledger::{InMemoryLedger, LedgerError, ProgramClient};
pub use quill_types::{EntryAddress, JournalEntry, OwnerId};
