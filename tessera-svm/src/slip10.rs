//! SLIP-0010 Ed25519 key derivation.
//!
//! Implements SLIP-0010 for deriving Ed25519 keys from a seed.
//! Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md

use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tessera::{Error, Result};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

const ED25519_CURVE: &[u8] = b"ed25519 seed";

/// Hardened index offset.
pub const HARDENED: u32 = 0x8000_0000;

/// SLIP-0010 derived key pair.
pub struct DerivedKey {
    /// 32-byte private key.
    pub private_key: Zeroizing<[u8; 32]>,
    /// 32-byte chain code.
    pub chain_code: Zeroizing<[u8; 32]>,
}

impl DerivedKey {
    /// Derive master key from seed using SLIP-0010.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        Self::hmac(ED25519_CURVE, &[seed])
    }

    /// Derive child key at hardened index.
    ///
    /// SLIP-0010 only supports hardened derivation for Ed25519, so `index`
    /// is the unhardened number and the hardened bit is added here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Derivation`] if `index` already has the hardened bit
    /// set, as it would alias `index - 2^31`.
    pub fn derive_hardened(&self, index: u32) -> Result<Self> {
        if index >= HARDENED {
            return Err(Error::Derivation(format!(
                "index {index} is out of range for hardened derivation"
            )));
        }
        let hardened_index = index | HARDENED;
        // 0x00 || private_key || index
        Self::hmac(
            &*self.chain_code,
            &[&[0x00], &*self.private_key, &hardened_index.to_be_bytes()],
        )
    }

    /// Derive along `segments` (each one treated as hardened).
    pub fn derive_path(seed: &[u8], segments: &[u32]) -> Result<Self> {
        segments
            .iter()
            .try_fold(Self::from_seed(seed)?, |key, &index| {
                key.derive_hardened(index)
            })
    }

    /// Convert to Ed25519 signing key.
    pub fn to_signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.private_key)
    }

    fn hmac(key: &[u8], parts: &[&[u8]]) -> Result<Self> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| Error::Derivation(format!("hmac key rejected: {e}")))?;
        for part in parts {
            mac.update(part);
        }
        let result = mac.finalize().into_bytes();

        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);

        private_key.copy_from_slice(&result[..32]);
        chain_code.copy_from_slice(&result[32..]);

        Ok(Self {
            private_key,
            chain_code,
        })
    }
}

/// Render hardened segments as `m/a'/b'/...`.
pub fn format_path(segments: &[u32]) -> String {
    let mut path = String::from("m");
    for index in segments {
        path.push_str(&format!("/{index}'"));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // SLIP-0010 test vector 1 for ed25519
    const SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    #[test]
    fn test_master_key_derivation() {
        let master = DerivedKey::from_seed(&SEED).unwrap();
        assert_eq!(
            *master.private_key,
            hex!("2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7")
        );
        assert_eq!(
            *master.chain_code,
            hex!("90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb")
        );
    }

    #[test]
    fn test_child_derivation() {
        // m/0'
        let child = DerivedKey::derive_path(&SEED, &[0]).unwrap();
        assert_eq!(
            *child.private_key,
            hex!("68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3")
        );
        assert_eq!(
            *child.chain_code,
            hex!("8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69")
        );
    }

    #[test]
    fn test_rejects_index_with_hardened_bit() {
        assert!(matches!(
            DerivedKey::derive_path(&SEED, &[1 | HARDENED]),
            Err(Error::Derivation(_))
        ));
        assert!(DerivedKey::derive_path(&SEED, &[HARDENED - 1]).is_ok());
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[44, 501, 0, 0]), "m/44'/501'/0'/0'");
        assert_eq!(format_path(&[]), "m");
    }
}
