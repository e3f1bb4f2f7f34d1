use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::OwnerId;

/// Namespace tag mixed into every derivation. Addresses derived by other
/// programs cannot collide with ours even for identical `(title, owner)`.
const PROGRAM_NAMESPACE: &str = "quill-journal-v1";

/// Deterministic storage address of a journal entry.
///
/// An `EntryAddress` is derived from the entry's title and its owner's
/// identity using BLAKE3. The same `(title, owner)` pair always produces the
/// same address, which is how update and delete locate an existing entry
/// without a separate index. Because the title feeds the derivation, renaming
/// an entry in place is impossible: a new title is a new address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryAddress {
    hash: [u8; 32],
}

impl EntryAddress {
    /// Derive the address for `(title, owner)`.
    ///
    /// Pure and deterministic; performs no I/O. The owner's fixed-length key
    /// is hashed before the variable-length title, so distinct pairs cannot
    /// produce the same input stream.
    pub fn derive(title: &str, owner: &OwnerId) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(PROGRAM_NAMESPACE.as_bytes());
        hasher.update(b":");
        hasher.update(owner.as_bytes());
        hasher.update(title.as_bytes());
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// The raw 32-byte address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("ja:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("ja:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte hash. Use `derive()` for production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for EntryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryAddress({})", self.short_id())
    }
}

impl fmt::Display for EntryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derive_is_deterministic() {
        let owner = OwnerId::from_bytes([1u8; 32]);
        let a1 = EntryAddress::derive("Trip", &owner);
        let a2 = EntryAddress::derive("Trip", &owner);
        assert_eq!(a1, a2);
    }

    #[test]
    fn different_titles_produce_different_addresses() {
        let owner = OwnerId::from_bytes([1u8; 32]);
        let a1 = EntryAddress::derive("Trip", &owner);
        let a2 = EntryAddress::derive("Groceries", &owner);
        assert_ne!(a1, a2);
    }

    #[test]
    fn different_owners_produce_different_addresses() {
        let a1 = EntryAddress::derive("Trip", &OwnerId::from_bytes([1u8; 32]));
        let a2 = EntryAddress::derive("Trip", &OwnerId::from_bytes([2u8; 32]));
        assert_ne!(a1, a2);
    }

    #[test]
    fn short_id_format() {
        let addr = EntryAddress::derive("x", &OwnerId::from_bytes([0; 32]));
        let short = addr.short_id();
        assert!(short.starts_with("ja:"));
        assert_eq!(short.len(), 11);
    }

    #[test]
    fn hex_roundtrip() {
        let addr = EntryAddress::derive("Trip", &OwnerId::from_bytes([9u8; 32]));
        let parsed = EntryAddress::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn serde_roundtrip() {
        let addr = EntryAddress::derive("Trip", &OwnerId::from_bytes([9u8; 32]));
        let json = serde_json::to_string(&addr).unwrap();
        let parsed: EntryAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn ordering_is_consistent() {
        let a1 = EntryAddress::from_raw([0; 32]);
        let a2 = EntryAddress::from_raw([1; 32]);
        assert!(a1 < a2);
    }

    proptest! {
        #[test]
        fn derive_deterministic_for_all_inputs(title in ".{0,64}", key in prop::array::uniform32(any::<u8>())) {
            let owner = OwnerId::from_bytes(key);
            prop_assert_eq!(EntryAddress::derive(&title, &owner), EntryAddress::derive(&title, &owner));
        }

        #[test]
        fn distinct_owners_never_collide(title in ".{0,64}", a in prop::array::uniform32(any::<u8>()), b in prop::array::uniform32(any::<u8>())) {
            prop_assume!(a != b);
            let addr_a = EntryAddress::derive(&title, &OwnerId::from_bytes(a));
            let addr_b = EntryAddress::derive(&title, &OwnerId::from_bytes(b));
            prop_assert_ne!(addr_a, addr_b);
        }
    }
}
