use serde::{Deserialize, Serialize};
use quill_types::OwnerId;

/// Ed25519 keypair backing a wallet identity.
pub struct Keypair(ed25519_dalek::SigningKey);

/// Ed25519 signature over a transaction's signing message.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "signature_serde")] ed25519_dalek::Signature);

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Create from raw 32-byte secret.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// The public identity derived from this keypair.
    pub fn owner_id(&self) -> OwnerId {
        OwnerId::from_bytes(self.0.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message))
    }

    /// Raw secret key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl Signature {
    /// Raw 64-byte signature.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }
}

/// Verify a signature against the owner's public key.
///
/// Fails with [`SignatureError::InvalidKey`] if the owner's bytes are not a
/// valid ed25519 public key, or [`SignatureError::InvalidSignature`] if the
/// signature does not verify over `message`.
pub fn verify(owner: &OwnerId, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
    use ed25519_dalek::Verifier;
    let key = ed25519_dalek::VerifyingKey::from_bytes(owner.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    key.verify(message, &signature.0)
        .map_err(|_| SignatureError::InvalidSignature)
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Keypair(<redacted>)")
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0.to_bytes()[..8]))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Errors from signing and verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
}

mod signature_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(sig: &ed25519_dalek::Signature, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&sig.to_bytes())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ed25519_dalek::Signature, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Vec::deserialize(deserializer)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 64-byte signature"))?;
        Ok(ed25519_dalek::Signature::from_bytes(&arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"hello world");
        assert!(verify(&kp.owner_id(), b"hello world", &sig).is_ok());
    }

    #[test]
    fn verify_fails_on_wrong_message() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"correct message");
        assert_eq!(
            verify(&kp.owner_id(), b"wrong message", &sig),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let kp1 = Keypair::generate();
        let kp2 = Keypair::generate();
        let sig = kp1.sign(b"message");
        assert!(verify(&kp2.owner_id(), b"message", &sig).is_err());
    }

    #[test]
    fn owner_id_is_deterministic() {
        let kp = Keypair::generate();
        assert_eq!(kp.owner_id(), kp.owner_id());
    }

    #[test]
    fn different_keys_different_owners() {
        let kp1 = Keypair::generate();
        let kp2 = Keypair::generate();
        assert_ne!(kp1.owner_id(), kp2.owner_id());
    }

    #[test]
    fn from_bytes_roundtrip() {
        let kp = Keypair::generate();
        let bytes = *kp.as_bytes();
        let kp2 = Keypair::from_bytes(bytes);
        assert_eq!(kp.owner_id(), kp2.owner_id());
    }

    #[test]
    fn signature_serde_roundtrip() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"test");
        let json = serde_json::to_string(&sig).unwrap();
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, parsed);
    }

    #[test]
    fn debug_redacts_keypair() {
        let kp = Keypair::generate();
        let debug = format!("{kp:?}");
        assert!(debug.contains("redacted"));
    }
}
