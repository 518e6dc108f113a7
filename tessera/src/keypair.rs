//! Derived keypairs and their zeroizing secret material.

use core::fmt;

use zeroize::Zeroizing;

use crate::chain::Chain;

/// A 32-byte private key (secp256k1 scalar or ed25519 seed), zeroized on drop.
///
/// Not `Clone`, not serializable, and redacted in `Debug`. Chain crates read
/// the bytes through [`SecretKey::expose`] only to build a signer.
pub struct SecretKey(Zeroizing<[u8; 32]>);

impl SecretKey {
    /// Take ownership of raw key bytes.
    #[must_use]
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Borrow the raw key bytes.
    ///
    /// **Security Warning**: callers must not copy these bytes into
    /// long-lived state.
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// A keypair derived at one account index of one chain.
///
/// Immutable once derived. Owned by the registry entry that created it;
/// the signer only ever borrows it.
pub struct Keypair {
    chain: Chain,
    account_index: u32,
    path: String,
    address: String,
    public_key: Vec<u8>,
    secret: SecretKey,
}

impl Keypair {
    /// Assemble a keypair from derived parts.
    ///
    /// # Arguments
    ///
    /// * `chain` - Chain the key belongs to
    /// * `account_index` - Derivation counter within the chain
    /// * `path` - Rendered derivation path (e.g. `m/44'/60'/0'/0/0`)
    /// * `address` - Chain-encoded public identifier
    /// * `public_key` - Public key bytes in the chain's native form
    /// * `secret` - Private key material
    #[must_use]
    pub fn new(
        chain: Chain,
        account_index: u32,
        path: String,
        address: String,
        public_key: Vec<u8>,
        secret: SecretKey,
    ) -> Self {
        Self {
            chain,
            account_index,
            path,
            address,
            public_key,
            secret,
        }
    }

    /// Chain this key belongs to.
    #[inline]
    #[must_use]
    pub const fn chain(&self) -> Chain {
        self.chain
    }

    /// Account index the key was derived at.
    #[inline]
    #[must_use]
    pub const fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Derivation path string.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Public identifier (checksummed hex or base58).
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Public key bytes (uncompressed SEC1 for secp256k1, 32 bytes for ed25519).
    #[inline]
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Private key material.
    #[inline]
    #[must_use]
    pub const fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("chain", &self.chain)
            .field("account_index", &self.account_index)
            .field("path", &self.path)
            .field("address", &self.address)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}
