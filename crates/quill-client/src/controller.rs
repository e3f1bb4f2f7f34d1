use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use quill_crypto::{Signature, Wallet};
use quill_ledger::{
    EntryAccounts, Instruction, LedgerError, ProgramClient, Transaction,
};
use quill_types::{EntryAddress, JournalEntry, TypeError, MAX_MESSAGE_LEN};

use crate::error::{ClientError, ClientResult};
use crate::status::{OperationKind, OperationStatus};

/// Whether every successful mutation triggers a full refresh of the cache.
///
/// The cache is only ever updated from a confirmed remote read, never
/// optimistically, which trades an extra round trip per mutation for a list
/// that always reflects the remote store's truth. Flip this for
/// optimistic-update experiments without touching each operation.
pub const RESYNC_AFTER_MUTATION: bool = true;

/// Terminal outcome of a delete.
///
/// `AlreadyAbsent` covers the remote reporting the account missing: the
/// desired end state (entry gone) already holds, so the controller treats it
/// as a non-error outcome rather than a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Signature),
    AlreadyAbsent,
}

/// Client-side controller for journal entries.
///
/// Owns the local cache of fetched entries and orchestrates the four
/// operations against the remote store. Operations are independent async
/// calls with no coordination between them; the remote store is the single
/// source of truth and enforces ownership and uniqueness at execution. The
/// cache is replaced wholesale by successful refreshes and never partially
/// mutated, so overlapping refreshes simply race and the last to resolve
/// wins.
pub struct EntryController {
    wallet: Arc<dyn Wallet>,
    ledger: Arc<dyn ProgramClient>,
    cache: watch::Sender<Vec<JournalEntry>>,
    status: watch::Sender<OperationStatus>,
}

impl EntryController {
    pub fn new(wallet: Arc<dyn Wallet>, ledger: Arc<dyn ProgramClient>) -> Self {
        Self {
            wallet,
            ledger,
            cache: watch::Sender::new(Vec::new()),
            status: watch::Sender::new(OperationStatus::Idle),
        }
    }

    /// Snapshot of the current cache.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.cache.borrow().clone()
    }

    /// Subscribe to cache snapshots. Receivers see each wholesale
    /// replacement, never partial mutations.
    pub fn subscribe(&self) -> watch::Receiver<Vec<JournalEntry>> {
        self.cache.subscribe()
    }

    /// The latest operation status.
    pub fn status(&self) -> OperationStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to operation status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<OperationStatus> {
        self.status.subscribe()
    }

    /// Re-fetch all entries owned by the current identity, replacing the
    /// cache wholesale on success.
    ///
    /// With no wallet identity this is a no-op (there is nothing owned to
    /// show yet) and returns the cache unchanged. On failure the cache is
    /// left untouched (stale-but-present beats wiped) and the error is
    /// surfaced without retry.
    pub async fn refresh_all(&self) -> ClientResult<Vec<JournalEntry>> {
        if self.wallet.owner().is_none() {
            debug!("refresh skipped: no wallet identity");
            return Ok(self.entries());
        }
        self.begin(OperationKind::Refresh);
        let result = self.run_refresh().await;
        self.finish(OperationKind::Refresh, result)
    }

    /// Create a new entry titled `title` with `message`.
    ///
    /// The storage address is derived from `(title, owner)`; a duplicate
    /// title for this owner surfaces as [`LedgerError::AccountInUse`], never
    /// a silent merge. The cache is not touched until the post-mutation
    /// refresh confirms the entry remotely.
    pub async fn create(&self, title: &str, message: &str) -> ClientResult<Signature> {
        self.begin(OperationKind::Create);
        let result = self.create_inner(title, message).await;
        self.finish(OperationKind::Create, result)
    }

    /// Replace an existing entry's message.
    ///
    /// The entry's title and address are reused unchanged; no re-derivation
    /// is needed since the title is immutable. Ownership is enforced by the
    /// remote store: acting under an identity other than `entry.owner` is
    /// rejected there.
    pub async fn update(&self, entry: &JournalEntry, new_message: &str) -> ClientResult<Signature> {
        self.begin(OperationKind::Update);
        let result = self.update_inner(entry, new_message).await;
        self.finish(OperationKind::Update, result)
    }

    /// Delete an entry.
    ///
    /// The address is defensively re-derived from `(entry.title, owner)`
    /// rather than trusted from the cached snapshot, guarding against a
    /// stale cache entry pointing at a reclaimed account.
    pub async fn delete(&self, entry: &JournalEntry) -> ClientResult<DeleteOutcome> {
        self.begin(OperationKind::Delete);
        let result = self.delete_inner(entry).await;
        self.finish(OperationKind::Delete, result)
    }

    async fn create_inner(&self, title: &str, message: &str) -> ClientResult<Signature> {
        let owner = self.wallet.owner().ok_or(ClientError::IdentityMissing)?;
        // Local validation and address derivation in one step; no remote
        // call is attempted for malformed input.
        let entry = JournalEntry::new(title, message, owner)?;
        let tx = Transaction::new(
            Instruction::CreateEntry {
                title: entry.title.clone(),
                message: entry.message.clone(),
            },
            EntryAccounts {
                entry: entry.address,
                owner,
            },
        );
        let signature = self.submit(tx).await?;
        info!(address = %entry.address, title = %entry.title, "journal entry created");
        self.resync().await;
        Ok(signature)
    }

    async fn update_inner(&self, entry: &JournalEntry, new_message: &str) -> ClientResult<Signature> {
        let owner = self.wallet.owner().ok_or(ClientError::IdentityMissing)?;
        if new_message.len() > MAX_MESSAGE_LEN {
            return Err(TypeError::MessageTooLong {
                len: new_message.len(),
                max: MAX_MESSAGE_LEN,
            }
            .into());
        }
        let tx = Transaction::new(
            Instruction::UpdateEntry {
                title: entry.title.clone(),
                message: new_message.to_string(),
            },
            EntryAccounts {
                entry: entry.address,
                owner,
            },
        );
        let signature = self.submit(tx).await?;
        info!(address = %entry.address, "journal entry updated");
        self.resync().await;
        Ok(signature)
    }

    async fn delete_inner(&self, entry: &JournalEntry) -> ClientResult<DeleteOutcome> {
        let owner = self.wallet.owner().ok_or(ClientError::IdentityMissing)?;
        let address = EntryAddress::derive(&entry.title, &owner);
        let tx = Transaction::new(
            Instruction::DeleteEntry {
                title: entry.title.clone(),
            },
            EntryAccounts {
                entry: address,
                owner,
            },
        );
        match self.submit(tx).await {
            Ok(signature) => {
                info!(address = %address, "journal entry deleted");
                self.resync().await;
                Ok(DeleteOutcome::Deleted(signature))
            }
            Err(ClientError::Ledger(LedgerError::AccountNotFound)) if address == entry.address => {
                // The re-derived address names the same account the snapshot
                // did, so "not found" means the desired end state already
                // holds. When the addresses differ (acting identity is not
                // the entry's owner), the miss is a rejection, not absence.
                info!(address = %address, "journal entry already absent");
                self.resync().await;
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(err) => Err(err),
        }
    }

    /// Sign and submit a transaction through the wallet and ledger
    /// capabilities.
    async fn submit(&self, tx: Transaction) -> ClientResult<Signature> {
        let message = tx.signing_message()?;
        let signature = self.wallet.sign(&message)?;
        let confirmed = self.ledger.execute(&tx.into_signed(signature)).await?;
        Ok(confirmed)
    }

    /// Fetch, validate, filter to the current owner, and replace the cache.
    async fn run_refresh(&self) -> ClientResult<Vec<JournalEntry>> {
        let owner = match self.wallet.owner() {
            Some(owner) => owner,
            None => return Ok(self.entries()),
        };
        let records = self.ledger.fetch_entries().await?;
        let mut entries = Vec::new();
        for record in records {
            match JournalEntry::from_account_data(record.address, &record.data) {
                Ok(entry) if entry.owner == owner => entries.push(entry),
                Ok(_) => {}
                Err(err) => {
                    warn!(address = %record.address, error = %err, "excluding malformed account record");
                }
            }
        }
        debug!(count = entries.len(), "cache replaced");
        self.cache.send_replace(entries.clone());
        Ok(entries)
    }

    /// Post-mutation resynchronization. A refresh failure here does not fail
    /// the already-confirmed mutation; the stale cache is kept and the error
    /// logged.
    async fn resync(&self) {
        if !RESYNC_AFTER_MUTATION {
            return;
        }
        if let Err(err) = self.run_refresh().await {
            warn!(error = %err, "post-mutation refresh failed; cache left stale");
        }
    }

    fn begin(&self, kind: OperationKind) {
        self.status.send_replace(OperationStatus::Pending { kind });
    }

    fn finish<T>(&self, kind: OperationKind, result: ClientResult<T>) -> ClientResult<T> {
        let status = match &result {
            Ok(_) => OperationStatus::Succeeded { kind },
            Err(err) => {
                warn!(?kind, error = %err, "operation failed");
                OperationStatus::Failed {
                    kind,
                    error: err.to_string(),
                }
            }
        };
        self.status.send_replace(status);
        result
    }
}

impl std::fmt::Debug for EntryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryController")
            .field("owner", &self.wallet.owner())
            .field("cached_entries", &self.cache.borrow().len())
            .finish()
    }
}
