use serde::{Deserialize, Serialize};

use crate::address::EntryAddress;
use crate::error::TypeError;
use crate::identity::OwnerId;

/// Maximum title length in bytes. The title feeds address derivation and is
/// part of the account's allocated space, so the limit is enforced on both
/// sides of the boundary.
pub const MAX_TITLE_LEN: usize = 60;

/// Maximum message length in bytes.
pub const MAX_MESSAGE_LEN: usize = 300;

/// A journal entry as it exists in the remote store.
///
/// `address` is the primary key and is always equal to
/// `EntryAddress::derive(title, owner)`. `title` is immutable after creation
/// (it is part of the key); only `message` may change over the entry's life.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub address: EntryAddress,
    pub owner: OwnerId,
    pub title: String,
    pub message: String,
}

/// Wire form of an entry's account data. The address is not stored; it is
/// the account's key and is recomputed for validation on read.
#[derive(Serialize, Deserialize)]
struct AccountData {
    owner: OwnerId,
    title: String,
    message: String,
}

impl JournalEntry {
    /// Build a validated entry, deriving its address from `(title, owner)`.
    pub fn new(title: impl Into<String>, message: impl Into<String>, owner: OwnerId) -> Result<Self, TypeError> {
        let title = title.into();
        let message = message.into();
        validate_fields(&title, &message)?;
        let address = EntryAddress::derive(&title, &owner);
        Ok(Self {
            address,
            owner,
            title,
            message,
        })
    }

    /// Encode the entry's account data (owner, title, message).
    pub fn to_account_data(&self) -> Result<Vec<u8>, TypeError> {
        let data = AccountData {
            owner: self.owner,
            title: self.title.clone(),
            message: self.message.clone(),
        };
        bincode::serialize(&data).map_err(|e| TypeError::Encoding(e.to_string()))
    }

    /// Decode and validate an entry fetched from the remote store.
    ///
    /// Rejects records with malformed fields and records whose stored address
    /// does not match the address derived from `(title, owner)`; a mismatch
    /// means the account was written under different seeds than it claims.
    pub fn from_account_data(address: EntryAddress, bytes: &[u8]) -> Result<Self, TypeError> {
        let data: AccountData =
            bincode::deserialize(bytes).map_err(|e| TypeError::Encoding(e.to_string()))?;
        validate_fields(&data.title, &data.message)?;
        if EntryAddress::derive(&data.title, &data.owner) != address {
            return Err(TypeError::AddressMismatch);
        }
        Ok(Self {
            address,
            owner: data.owner,
            title: data.title,
            message: data.message,
        })
    }
}

/// Field-level validation shared by construction and the read boundary.
pub(crate) fn validate_fields(title: &str, message: &str) -> Result<(), TypeError> {
    if title.is_empty() {
        return Err(TypeError::EmptyTitle);
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(TypeError::TitleTooLong {
            len: title.len(),
            max: MAX_TITLE_LEN,
        });
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Err(TypeError::MessageTooLong {
            len: message.len(),
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(())
}
