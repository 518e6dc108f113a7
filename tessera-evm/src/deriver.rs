//! Ethereum keypair derivation from a wallet seed.

use bip32::{DerivationPath, XPrv};
use k256::ecdsa::SigningKey;
use tessera::{Chain, Error, Keypair, Result, SecretKey, Seed};
use zeroize::Zeroizing;

use crate::address::public_key_to_address;
use crate::derivation_style::DerivationStyle;

/// Ethereum keypair deriver over a BIP-39 seed.
///
/// Derives secp256k1 keys following BIP-32/44 for the configured
/// [`DerivationStyle`].
///
/// # Example
///
/// ```
/// use tessera::Wallet;
/// use tessera_evm::{DerivationStyle, Deriver};
///
/// let wallet = Wallet::generate(12, None).unwrap();
/// let deriver = Deriver::new(wallet.seed(), DerivationStyle::Standard);
/// let keypair = deriver.derive(0).unwrap();
/// assert!(keypair.address().starts_with("0x"));
/// ```
#[derive(Debug)]
pub struct Deriver<'a> {
    seed: &'a Seed,
    style: DerivationStyle,
}

impl<'a> Deriver<'a> {
    /// Create a new Ethereum deriver.
    #[must_use]
    pub const fn new(seed: &'a Seed, style: DerivationStyle) -> Self {
        Self { seed, style }
    }

    /// Derive the keypair at `index` using the deriver's style.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    #[inline]
    pub fn derive(&self, index: u32) -> Result<Keypair> {
        self.derive_at_path(index, &self.style.path(index))
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

    /// Derive a keypair at a custom derivation path.
    ///
    /// `index` is recorded on the keypair as its account index.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is malformed or derivation fails.
    pub fn derive_at_path(&self, index: u32, path: &str) -> Result<Keypair> {
        let signing_key = self.derive_key(path)?;

        let public_key = signing_key.verifying_key().to_encoded_point(false);
        let address = public_key_to_address(public_key.as_bytes());

        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(&signing_key.to_bytes());

        Ok(Keypair::new(
            Chain::Ethereum,
            index,
            path.to_string(),
            address,
            public_key.as_bytes().to_vec(),
            SecretKey::new(*secret),
        ))
    }

    /// Derive a private key at the given path using bip32 crate.
    fn derive_key(&self, path: &str) -> Result<SigningKey> {
        let derivation_path: DerivationPath = path
            .parse()
            .map_err(|e| Error::Derivation(format!("invalid derivation path: {e}")))?;

        let derived = XPrv::derive_from_path(self.seed.as_bytes(), &derivation_path)
            .map_err(|e| Error::Derivation(format!("key derivation failed: {e}")))?;

        Ok(derived.private_key().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera::Wallet;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_wallet() -> Wallet {
        Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap()
    }

    #[test]
    fn test_golden_address() {
        let wallet = test_wallet();
        let deriver = Deriver::new(wallet.seed(), DerivationStyle::Standard);
        let keypair = deriver.derive(0).unwrap();

        assert_eq!(keypair.address(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(keypair.path(), "m/44'/60'/0'/0/0");
        assert_eq!(keypair.chain(), Chain::Ethereum);
        assert_eq!(keypair.public_key().len(), 65);
        assert_eq!(
            hex::encode(keypair.secret().expose()),
            "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
    }

    #[test]
    fn test_golden_address_default_style() {
        let wallet = test_wallet();
        let deriver = Deriver::new(wallet.seed(), DerivationStyle::default());
        let keypairs = deriver.derive_many(0, 2).unwrap();

        assert_eq!(keypairs[0].address(), "0x1cC31E180CCA3a8698fD6f13765209EC7CB9E755");
        assert_eq!(keypairs[0].path(), "m/44'/60'/0'/0'");
        assert_eq!(
            hex::encode(keypairs[0].secret().expose()),
            "43ff9ebfdccfa25e3921d9500db2f946d46a525fa08004af7f98976d9706cd5c"
        );
        assert_eq!(keypairs[1].address(), "0x3590821f4FD8B921B74d923475B7DA6c9b2aE83b");
        assert_eq!(keypairs[1].path(), "m/44'/60'/1'/0'");
    }

    #[test]
    fn test_derive_multiple_unique() {
        let wallet = test_wallet();
        let deriver = Deriver::new(wallet.seed(), DerivationStyle::Standard);
        let keypairs = deriver.derive_many(0, 5).unwrap();

        assert_eq!(keypairs.len(), 5);
        let mut seen = Vec::new();
        for (i, keypair) in keypairs.iter().enumerate() {
            assert_eq!(keypair.account_index() as usize, i);
            assert!(!seen.contains(&keypair.address().to_string()));
            seen.push(keypair.address().to_string());
        }
    }

    #[test]
    fn test_deterministic_derivation() {
        let wallet1 = test_wallet();
        let wallet2 = test_wallet();

        for style in DerivationStyle::all() {
            let a = Deriver::new(wallet1.seed(), *style).derive(3).unwrap();
            let b = Deriver::new(wallet2.seed(), *style).derive(3).unwrap();
            assert_eq!(a.address(), b.address());
            assert_eq!(a.secret().expose(), b.secret().expose());
        }
    }

    #[test]
    fn test_passphrase_changes_addresses() {
        let wallet1 = test_wallet();
        let wallet2 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("password")).unwrap();

        let a = Deriver::new(wallet1.seed(), DerivationStyle::Standard).derive(0).unwrap();
        let b = Deriver::new(wallet2.seed(), DerivationStyle::Standard).derive(0).unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_different_styles_produce_different_addresses() {
        let wallet = test_wallet();
        let addresses: Vec<String> = DerivationStyle::all()
            .iter()
            .map(|style| {
                Deriver::new(wallet.seed(), *style)
                    .derive(1)
                    .unwrap()
                    .address()
                    .to_string()
            })
            .collect();

        for (i, a) in addresses.iter().enumerate() {
            for b in &addresses[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_invalid_path() {
        let wallet = test_wallet();
        let deriver = Deriver::new(wallet.seed(), DerivationStyle::Standard);
        assert!(matches!(
            deriver.derive_at_path(0, "m/44'/x"),
            Err(Error::Derivation(_))
        ));
    }
}
