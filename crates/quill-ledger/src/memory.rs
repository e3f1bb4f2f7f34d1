use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use quill_crypto::{verify, Signature};
use quill_types::{EntryAddress, JournalEntry, TypeError};

use crate::error::LedgerError;
use crate::instruction::{Instruction, SignedTransaction};
use crate::traits::{AccountRecord, ProgramClient};

/// In-memory journal program for tests, local demos, and embedding.
///
/// Enforces the same rules the remote program does: transaction signatures
/// must verify against the owner key, create fails on an occupied address,
/// update and delete require the signer to own the account, and the entry
/// account must match the address derived from `(title, owner)`.
///
/// `set_offline(true)` makes every call fail with [`LedgerError::Transport`]
/// for exercising failure paths.
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<EntryAddress, Vec<u8>>>,
    offline: AtomicBool,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Number of accounts currently stored.
    pub fn len(&self) -> usize {
        self.accounts.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no accounts are stored.
    pub fn is_empty(&self) -> bool {
        self.accounts.read().expect("lock poisoned").is_empty()
    }

    /// Whether an account exists at `address`.
    pub fn contains(&self, address: &EntryAddress) -> bool {
        self.accounts
            .read()
            .expect("lock poisoned")
            .contains_key(address)
    }

    /// Remove all accounts.
    pub fn clear(&self) {
        self.accounts.write().expect("lock poisoned").clear();
    }

    /// Simulate loss of connectivity: while offline, every call fails with
    /// [`LedgerError::Transport`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Place raw bytes at an address, bypassing program rules. For tests that
    /// need corrupted or foreign account data in the store.
    pub fn inject_account(&self, address: EntryAddress, data: Vec<u8>) {
        self.accounts
            .write()
            .expect("lock poisoned")
            .insert(address, data);
    }

    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LedgerError::Transport("ledger offline".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn encoding(err: TypeError) -> LedgerError {
    LedgerError::Encoding(err.to_string())
}

#[async_trait]
impl ProgramClient for InMemoryLedger {
    async fn execute(&self, tx: &SignedTransaction) -> Result<Signature, LedgerError> {
        self.check_online()?;

        let message = tx.transaction.signing_message()?;
        verify(&tx.transaction.accounts.owner, &message, &tx.signature)
            .map_err(|_| LedgerError::InvalidSignature)?;

        let accounts = tx.transaction.accounts;
        let mut map = self.accounts.write().expect("lock poisoned");

        match &tx.transaction.instruction {
            Instruction::CreateEntry { title, message } => {
                // Field limits are the program's account space; re-derivation
                // is the seeds check.
                let entry = JournalEntry::new(title.clone(), message.clone(), accounts.owner)
                    .map_err(encoding)?;
                if entry.address != accounts.entry {
                    return Err(LedgerError::AddressMismatch);
                }
                if map.contains_key(&entry.address) {
                    return Err(LedgerError::AccountInUse);
                }
                let data = entry.to_account_data().map_err(encoding)?;
                map.insert(entry.address, data);
            }
            Instruction::UpdateEntry { title, message } => {
                let bytes = map
                    .get(&accounts.entry)
                    .ok_or(LedgerError::AccountNotFound)?;
                let stored =
                    JournalEntry::from_account_data(accounts.entry, bytes).map_err(encoding)?;
                if stored.owner != accounts.owner {
                    return Err(LedgerError::OwnershipViolation);
                }
                if &stored.title != title {
                    return Err(LedgerError::AddressMismatch);
                }
                let updated = JournalEntry::new(stored.title, message.clone(), stored.owner)
                    .map_err(encoding)?;
                let data = updated.to_account_data().map_err(encoding)?;
                map.insert(accounts.entry, data);
            }
            Instruction::DeleteEntry { title } => {
                let bytes = map
                    .get(&accounts.entry)
                    .ok_or(LedgerError::AccountNotFound)?;
                let stored =
                    JournalEntry::from_account_data(accounts.entry, bytes).map_err(encoding)?;
                if stored.owner != accounts.owner {
                    return Err(LedgerError::OwnershipViolation);
                }
                if EntryAddress::derive(title, &accounts.owner) != accounts.entry {
                    return Err(LedgerError::AddressMismatch);
                }
                map.remove(&accounts.entry);
            }
        }

        Ok(tx.signature.clone())
    }

    async fn fetch_entries(&self) -> Result<Vec<AccountRecord>, LedgerError> {
        self.check_online()?;
        let map = self.accounts.read().expect("lock poisoned");
        Ok(map
            .iter()
            .map(|(address, data)| AccountRecord {
                address: *address,
                data: data.clone(),
            })
            .collect())
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("account_count", &self.len())
            .field("offline", &self.offline.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{EntryAccounts, Transaction};
    use quill_crypto::Keypair;

    fn signed(kp: &Keypair, instruction: Instruction, entry: EntryAddress) -> SignedTransaction {
        let tx = Transaction::new(
            instruction,
            EntryAccounts {
                entry,
                owner: kp.owner_id(),
            },
        );
        let sig = kp.sign(&tx.signing_message().unwrap());
        tx.into_signed(sig)
    }

    fn create_tx(kp: &Keypair, title: &str, message: &str) -> SignedTransaction {
        let entry = EntryAddress::derive(title, &kp.owner_id());
        signed(
            kp,
            Instruction::CreateEntry {
                title: title.into(),
                message: message.into(),
            },
            entry,
        )
    }

    #[tokio::test]
    async fn create_stores_account() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(&EntryAddress::derive("Trip", &kp.owner_id())));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_address() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap();
        let err = ledger
            .execute(&create_tx(&kp, "Trip", "Different"))
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::AccountInUse);
    }

    #[tokio::test]
    async fn same_title_different_owner_is_allowed() {
        let ledger = InMemoryLedger::new();
        let kp1 = Keypair::generate();
        let kp2 = Keypair::generate();
        ledger.execute(&create_tx(&kp1, "Trip", "A")).await.unwrap();
        ledger.execute(&create_tx(&kp2, "Trip", "B")).await.unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_mismatched_account() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        let wrong = EntryAddress::derive("Other", &kp.owner_id());
        let tx = signed(
            &kp,
            Instruction::CreateEntry {
                title: "Trip".into(),
                message: "Day 1".into(),
            },
            wrong,
        );
        assert_eq!(ledger.execute(&tx).await.unwrap_err(), LedgerError::AddressMismatch);
    }

    #[tokio::test]
    async fn update_replaces_message() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap();

        let entry = EntryAddress::derive("Trip", &kp.owner_id());
        let tx = signed(
            &kp,
            Instruction::UpdateEntry {
                title: "Trip".into(),
                message: "Day 2".into(),
            },
            entry,
        );
        ledger.execute(&tx).await.unwrap();

        let records = ledger.fetch_entries().await.unwrap();
        let stored = JournalEntry::from_account_data(records[0].address, &records[0].data).unwrap();
        assert_eq!(stored.message, "Day 2");
        assert_eq!(stored.address, entry);
    }

    #[tokio::test]
    async fn update_missing_account_fails() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        let entry = EntryAddress::derive("Trip", &kp.owner_id());
        let tx = signed(
            &kp,
            Instruction::UpdateEntry {
                title: "Trip".into(),
                message: "Day 2".into(),
            },
            entry,
        );
        assert_eq!(ledger.execute(&tx).await.unwrap_err(), LedgerError::AccountNotFound);
    }

    #[tokio::test]
    async fn update_with_wrong_title_is_rejected() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap();

        // Account exists and is owned by the signer, but the carried title
        // does not match the seeds the account was created under.
        let entry = EntryAddress::derive("Trip", &kp.owner_id());
        let tx = signed(
            &kp,
            Instruction::UpdateEntry {
                title: "Other".into(),
                message: "Day 2".into(),
            },
            entry,
        );
        assert_eq!(
            ledger.execute(&tx).await.unwrap_err(),
            LedgerError::AddressMismatch
        );

        // The stored message is untouched.
        let records = ledger.fetch_entries().await.unwrap();
        let stored = JournalEntry::from_account_data(records[0].address, &records[0].data).unwrap();
        assert_eq!(stored.message, "Day 1");
    }

    #[tokio::test]
    async fn update_by_non_owner_is_rejected() {
        let ledger = InMemoryLedger::new();
        let owner = Keypair::generate();
        let intruder = Keypair::generate();
        ledger.execute(&create_tx(&owner, "Trip", "Day 1")).await.unwrap();

        let entry = EntryAddress::derive("Trip", &owner.owner_id());
        let tx = signed(
            &intruder,
            Instruction::UpdateEntry {
                title: "Trip".into(),
                message: "hijacked".into(),
            },
            entry,
        );
        assert_eq!(
            ledger.execute(&tx).await.unwrap_err(),
            LedgerError::OwnershipViolation
        );
    }

    #[tokio::test]
    async fn delete_removes_account() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap();

        let entry = EntryAddress::derive("Trip", &kp.owner_id());
        let tx = signed(
            &kp,
            Instruction::DeleteEntry {
                title: "Trip".into(),
            },
            entry,
        );
        ledger.execute(&tx).await.unwrap();
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_account_fails() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        let entry = EntryAddress::derive("Trip", &kp.owner_id());
        let tx = signed(
            &kp,
            Instruction::DeleteEntry {
                title: "Trip".into(),
            },
            entry,
        );
        assert_eq!(ledger.execute(&tx).await.unwrap_err(), LedgerError::AccountNotFound);
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_rejected() {
        let ledger = InMemoryLedger::new();
        let owner = Keypair::generate();
        let intruder = Keypair::generate();
        ledger.execute(&create_tx(&owner, "Trip", "Day 1")).await.unwrap();

        // The intruder targets the owner's account directly.
        let entry = EntryAddress::derive("Trip", &owner.owner_id());
        let tx = signed(
            &intruder,
            Instruction::DeleteEntry {
                title: "Trip".into(),
            },
            entry,
        );
        assert_eq!(
            ledger.execute(&tx).await.unwrap_err(),
            LedgerError::OwnershipViolation
        );
    }

    #[tokio::test]
    async fn forged_signature_is_rejected() {
        let ledger = InMemoryLedger::new();
        let owner = Keypair::generate();
        let forger = Keypair::generate();

        // Transaction claims the owner's identity but is signed by the forger.
        let entry = EntryAddress::derive("Trip", &owner.owner_id());
        let tx = Transaction::new(
            Instruction::CreateEntry {
                title: "Trip".into(),
                message: "Day 1".into(),
            },
            EntryAccounts {
                entry,
                owner: owner.owner_id(),
            },
        );
        let sig = forger.sign(&tx.signing_message().unwrap());
        let err = ledger.execute(&tx.into_signed(sig)).await.unwrap_err();
        assert_eq!(err, LedgerError::InvalidSignature);
    }

    #[tokio::test]
    async fn offline_ledger_fails_with_transport() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.set_offline(true);
        let err = ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
        assert!(matches!(
            ledger.fetch_entries().await.unwrap_err(),
            LedgerError::Transport(_)
        ));

        ledger.set_offline(false);
        ledger.execute(&create_tx(&kp, "Trip", "Day 1")).await.unwrap();
    }

    #[tokio::test]
    async fn fetch_returns_all_accounts() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "A", "1")).await.unwrap();
        ledger.execute(&create_tx(&kp, "B", "2")).await.unwrap();
        let records = ledger.fetch_entries().await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn clear_removes_all_accounts() {
        let ledger = InMemoryLedger::new();
        let kp = Keypair::generate();
        ledger.execute(&create_tx(&kp, "A", "1")).await.unwrap();
        ledger.execute(&create_tx(&kp, "B", "2")).await.unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
