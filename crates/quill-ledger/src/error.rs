/// Errors produced by the remote store.
///
/// The first five variants are remote rejections: the store refused the
/// operation. `Transport` is a network/RPC-level failure reaching the store
/// at all. The controller surfaces both the same way: failed outcome, no
/// automatic retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("account already in use at the derived address")]
    AccountInUse,

    #[error("account not found")]
    AccountNotFound,

    #[error("signer is not the account owner")]
    OwnershipViolation,

    #[error("entry account does not match the address derived from the seeds")]
    AddressMismatch,

    #[error("transaction signature does not verify against the owner key")]
    InvalidSignature,

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("transport failure: {0}")]
    Transport(String),
}
