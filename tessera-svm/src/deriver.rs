//! Solana keypair derivation from a wallet seed.

use tessera::{Chain, Keypair, Result, SecretKey, Seed};

use crate::derivation_style::DerivationStyle;
use crate::slip10::{format_path, DerivedKey};

/// Solana keypair deriver over a BIP-39 seed.
#[derive(Debug)]
pub struct Deriver<'a> {
    seed: &'a Seed,
    style: DerivationStyle,
}

impl<'a> Deriver<'a> {
    /// Create a new Solana deriver.
    #[inline]
    #[must_use]
    pub const fn new(seed: &'a Seed, style: DerivationStyle) -> Self {
        Self { seed, style }
    }

    /// Derive the keypair at account `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is 2^31 or above, or derivation fails.
    #[inline]
    pub fn derive(&self, index: u32) -> Result<Keypair> {
        self.derive_segments(index, &self.style.segments(index))
    }

    /// Derive along arbitrary hardened `segments`, recording `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    pub fn derive_segments(&self, index: u32, segments: &[u32]) -> Result<Keypair> {
        let derived = DerivedKey::derive_path(self.seed.as_bytes(), segments)?;
        let public_key = derived.to_signing_key().verifying_key().to_bytes();
        let address = bs58::encode(public_key).into_string();

        Ok(Keypair::new(
            Chain::Solana,
            index,
            format_path(segments),
            address,
            public_key.to_vec(),
            SecretKey::new(*derived.private_key),
        ))
    }

    /// Derive multiple keypairs in sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if any derivation fails.
    pub fn derive_many(&self, start_index: u32, count: u32) -> Result<Vec<Keypair>> {
        (start_index..start_index.saturating_add(count))
            .map(|index| self.derive(index))
            .collect()
    }
}
