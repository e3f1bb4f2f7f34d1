/// Errors produced by type construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title exceeds {max} bytes (got {len})")]
    TitleTooLong { len: usize, max: usize },

    #[error("message exceeds {max} bytes (got {len})")]
    MessageTooLong { len: usize, max: usize },

    #[error("stored address does not match the address derived from (title, owner)")]
    AddressMismatch,

    #[error("encoding error: {0}")]
    Encoding(String),
}
