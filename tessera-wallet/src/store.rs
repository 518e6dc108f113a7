//! Storage layout and an in-memory [`KeyValueStore`].
//!
//! Layout per chain:
//!
//! | namespace          | key          | value                                   |
//! |--------------------|--------------|-----------------------------------------|
//! | `wallets/<chain>`  | `addresses`  | JSON array of addresses, in index order |
//! | `wallets/<chain>`  | `active`     | UTF-8 address of the active wallet      |
//! | `secrets/<chain>`  | `<address>`  | lowercase hex of the 32-byte secret     |
//!
//! Secrets live in their own namespace so a store can put access control or
//! encryption on `secrets/*` alone.

use std::collections::HashMap;

use async_trait::async_trait;
use tessera::{Chain, Error, KeyValueStore, Result, SecretKey};
use tokio::sync::RwLock;
use zeroize::Zeroizing;

/// Key of the persisted address list.
pub const ADDRESSES_KEY: &str = "addresses";

/// Key of the persisted active address.
pub const ACTIVE_KEY: &str = "active";

/// Namespace holding public wallet data for `chain`.
#[must_use]
pub fn wallets_namespace(chain: Chain) -> String {
    format!("wallets/{}", chain.id())
}

/// Namespace holding secret key material for `chain`.
#[must_use]
pub fn secrets_namespace(chain: Chain) -> String {
    format!("secrets/{}", chain.id())
}

/// Encode an address list.
///
/// # Errors
///
/// Returns [`Error::Storage`] if serialization fails.
pub fn encode_addresses(addresses: &[String]) -> Result<Vec<u8>> {
    serde_json::to_vec(addresses).map_err(|e| Error::Storage(e.to_string()))
}

/// Decode an address list written by [`encode_addresses`].
///
/// # Errors
///
/// Returns [`Error::StorageCorrupted`] if the bytes are not a JSON string array.
pub fn decode_addresses(chain: Chain, bytes: &[u8]) -> Result<Vec<String>> {
    serde_json::from_slice(bytes).map_err(|_| Error::StorageCorrupted { chain, index: 0 })
}

/// Encode a secret for the secrets namespace.
#[must_use]
pub fn encode_secret(secret: &SecretKey) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(hex::encode(secret.expose()).into_bytes())
}

/// In-process store for tests and ephemeral sessions. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries
            .write()
            .await
            .insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        store.put("ns", "k", b"v1".to_vec()).await.unwrap();
        store.put("ns", "k", b"v2".to_vec()).await.unwrap();
        store.put("other", "k", b"x".to_vec()).await.unwrap();

        assert_eq!(store.get("ns", "k").await.unwrap(), Some(b"v2".to_vec()));
        assert_eq!(store.get("ns", "missing").await.unwrap(), None);
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(wallets_namespace(Chain::Ethereum), "wallets/ethereum");
        assert_eq!(secrets_namespace(Chain::Solana), "secrets/solana");
    }

    #[test]
    fn test_address_list_encoding() {
        let addresses = vec!["a".to_string(), "b".to_string()];
        let bytes = encode_addresses(&addresses).unwrap();
        assert_eq!(bytes, br#"["a","b"]"#);
        assert_eq!(decode_addresses(Chain::Solana, &bytes).unwrap(), addresses);
        assert_eq!(
            decode_addresses(Chain::Solana, b"{oops").unwrap_err(),
            Error::StorageCorrupted {
                chain: Chain::Solana,
                index: 0
            }
        );
    }

    #[test]
    fn test_secret_encoding() {
        let encoded = encode_secret(&SecretKey::new([0xab; 32]));
        assert_eq!(encoded.len(), 64);
        assert!(encoded.iter().all(|b| *b == b'a' || *b == b'b'));
    }
}
