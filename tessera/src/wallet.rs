//! BIP-39 wallet: the mnemonic root secret and the seed derived from it.

use core::fmt;

use bip39::Mnemonic;
use zeroize::Zeroizing;

use crate::error::{MnemonicError, Result};

/// A 64-byte BIP-39 seed, zeroized on drop.
///
/// Pure function of the mnemonic and passphrase; never mutated.
pub struct Seed(Zeroizing<[u8; 64]>);

impl Seed {
    /// Derive the seed for `phrase` (BIP-39 PBKDF2-HMAC-SHA512).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMnemonic`] naming the failing word,
    /// a bad word count, or a checksum mismatch.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = parse_mnemonic(phrase)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    fn from_parsed(mnemonic: &Mnemonic, passphrase: Option<&str>) -> Self {
        Self(Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or(""))))
    }

    /// Wrap raw seed bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Raw seed bytes for chain derivers.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// A unified HD wallet that can derive keys for every supported chain.
///
/// Holds the BIP-39 mnemonic and the seed derived from it. The same mnemonic
/// with a different passphrase produces an unrelated wallet.
pub struct Wallet {
    /// BIP-39 mnemonic phrase, normalized to single spaces.
    mnemonic: Zeroizing<String>,
    /// Seed derived from mnemonic + passphrase.
    seed: Seed,
    /// Whether a non-empty passphrase was used.
    has_passphrase: bool,
}

impl Wallet {
    /// Generate a new wallet with a random mnemonic.
    ///
    /// # Arguments
    ///
    /// * `word_count` - Number of words (12, 15, 18, 21, or 24)
    /// * `passphrase` - Optional BIP-39 passphrase
    ///
    /// # Errors
    ///
    /// Returns an error if the word count is invalid.
    pub fn generate(word_count: usize, passphrase: Option<&str>) -> Result<Self> {
        if !matches!(word_count, 12 | 15 | 18 | 21 | 24) {
            return Err(MnemonicError::InvalidWordCount(word_count).into());
        }
        let mnemonic = Mnemonic::generate(word_count)
            .map_err(|e| MnemonicError::Other(e.to_string()))?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    /// Create a wallet from raw entropy bytes (16, 20, 24, 28, or 32 bytes).
    ///
    /// # Errors
    ///
    /// Returns an error if the entropy length is invalid.
    pub fn from_entropy(entropy: &[u8], passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = Mnemonic::from_entropy(entropy)
            .map_err(|e| MnemonicError::from_bip39(e, ""))?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    /// Create a wallet from an existing mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMnemonic`] if the phrase is invalid.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = parse_mnemonic(phrase)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    fn from_parsed(mnemonic: &Mnemonic, passphrase: Option<&str>) -> Self {
        Self {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            seed: Seed::from_parsed(mnemonic, passphrase),
            has_passphrase: passphrase.is_some_and(|p| !p.is_empty()),
        }
    }

    /// Get the mnemonic phrase.
    ///
    /// **Security Warning**: this value reconstructs every derived key.
    #[inline]
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get the seed for key derivation.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Check if a passphrase was used to derive the seed.
    #[must_use]
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// Get the word count of the mnemonic.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.mnemonic.split_whitespace().count()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("word_count", &self.word_count())
            .field("has_passphrase", &self.has_passphrase)
            .finish_non_exhaustive()
    }
}

fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = Zeroizing::new(normalized.to_lowercase());
    Mnemonic::parse_normalized(&lowered)
        .map_err(|e| MnemonicError::from_bip39(e, &lowered).into())
}
