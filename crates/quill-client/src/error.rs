use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("no wallet identity available")]
    IdentityMissing,

    #[error("invalid entry: {0}")]
    InvalidEntry(#[from] quill_types::TypeError),

    #[error("wallet error: {0}")]
    Wallet(#[from] quill_crypto::WalletError),

    #[error("ledger error: {0}")]
    Ledger(#[from] quill_ledger::LedgerError),
}

pub type ClientResult<T> = Result<T, ClientError>;
