use serde::{Deserialize, Serialize};

use quill_crypto::Signature;
use quill_types::{EntryAddress, OwnerId};

use crate::error::LedgerError;

/// Program instructions. Titles are carried even where the entry account is
/// already known so the program can re-derive the address from its seeds and
/// reject mismatched accounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    CreateEntry { title: String, message: String },
    UpdateEntry { title: String, message: String },
    DeleteEntry { title: String },
}

/// The accounts a journal transaction touches: the entry being created or
/// mutated, and the owner who signs (and pays for) the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAccounts {
    pub entry: EntryAddress,
    pub owner: OwnerId,
}

/// An unsigned transaction: one instruction plus its account list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub instruction: Instruction,
    pub accounts: EntryAccounts,
}

impl Transaction {
    pub fn new(instruction: Instruction, accounts: EntryAccounts) -> Self {
        Self {
            instruction,
            accounts,
        }
    }

    /// The byte string the wallet signs: the bincode encoding of the whole
    /// transaction, so the signature covers instruction and accounts alike.
    pub fn signing_message(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Encoding(e.to_string()))
    }

    /// Attach a signature produced over [`Self::signing_message`].
    pub fn into_signed(self, signature: Signature) -> SignedTransaction {
        SignedTransaction {
            transaction: self,
            signature,
        }
    }
}

/// A transaction ready for submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
}
