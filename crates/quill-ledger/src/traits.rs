use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quill_crypto::Signature;
use quill_types::EntryAddress;

use crate::error::LedgerError;
use crate::instruction::SignedTransaction;

/// A raw account as fetched from the remote store: the address it lives at
/// plus its undecoded data bytes. Decoding and validation happen on the
/// client side of this boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: EntryAddress,
    pub data: Vec<u8>,
}

/// Client-side handle to the remote journal program.
#[async_trait]
pub trait ProgramClient: Send + Sync {
    /// Submit a signed transaction for execution. Returns the confirmed
    /// transaction signature on success.
    async fn execute(&self, tx: &SignedTransaction) -> Result<Signature, LedgerError>;

    /// Fetch every journal-entry account the program currently holds.
    async fn fetch_entries(&self) -> Result<Vec<AccountRecord>, LedgerError>;
}
