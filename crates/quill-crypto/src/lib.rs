//! Cryptographic primitives for Quill.
//!
//! Provides ed25519 keypairs and signatures, plus the [`Wallet`] capability
//! trait through which the controller obtains the current identity and signs
//! transactions. The wallet is a boundary: production embedders supply a real
//! wallet adapter, tests and demos use [`LocalWallet`].

pub mod signer;
pub mod wallet;

pub use signer::{verify, Keypair, Signature, SignatureError};
pub use wallet::{LocalWallet, Wallet, WalletError};
