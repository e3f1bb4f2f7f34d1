//! Remote-store boundary for Quill.
//!
//! The remote ledger is an opaque capability from the controller's point of
//! view: it executes signed transactions and serves full account reads. This
//! crate defines the instruction set, the [`ProgramClient`] trait the
//! controller talks through, and [`InMemoryLedger`], an in-memory
//! implementation that enforces the program's rules (address derivation,
//! uniqueness on create, ownership on mutate/delete) for tests and demos.

pub mod error;
pub mod instruction;
pub mod memory;
pub mod traits;

pub use error::LedgerError;
pub use instruction::{EntryAccounts, Instruction, SignedTransaction, Transaction};
pub use memory::InMemoryLedger;
pub use traits::{AccountRecord, ProgramClient};
