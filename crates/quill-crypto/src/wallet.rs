use quill_types::OwnerId;

use crate::signer::{Keypair, Signature};

/// Errors from wallet operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,
}

/// Identity and signing capability consumed by the controller.
///
/// `owner()` returns `None` while no wallet is connected; the controller
/// treats that as "nothing owned to show yet" rather than an error. `sign`
/// on a disconnected wallet fails with [`WalletError::NotConnected`].
pub trait Wallet: Send + Sync {
    /// The current identity, if a wallet is connected.
    fn owner(&self) -> Option<OwnerId>;

    /// Sign a transaction's signing message with the connected identity.
    fn sign(&self, message: &[u8]) -> Result<Signature, WalletError>;
}

/// In-process wallet holding an optional keypair.
///
/// Intended for tests, demos, and embedders that manage keys directly.
pub struct LocalWallet {
    keypair: Option<Keypair>,
}

impl LocalWallet {
    /// A wallet connected with the given keypair.
    pub fn connected(keypair: Keypair) -> Self {
        Self {
            keypair: Some(keypair),
        }
    }

    /// A wallet with no identity attached.
    pub fn disconnected() -> Self {
        Self { keypair: None }
    }
}

impl Wallet for LocalWallet {
    fn owner(&self) -> Option<OwnerId> {
        self.keypair.as_ref().map(|kp| kp.owner_id())
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, WalletError> {
        let kp = self.keypair.as_ref().ok_or(WalletError::NotConnected)?;
        Ok(kp.sign(message))
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("owner", &self.owner())
            .finish()
    }
}
