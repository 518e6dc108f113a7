//! Legacy (EIP-155) value transfers.
//!
//! Signing payload: `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
//! Wire encoding:   `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`
//! with `v = chainId * 2 + 35 + recovery_id`.

use alloy_primitives::{keccak256, Address};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rlp::RlpStream;
use tessera::{Error, Result, SecretKey};

use crate::address::public_key_to_address;

/// Gas consumed by a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// An EIP-155 legacy transfer with empty call data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTransfer {
    /// Sender account nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient address.
    pub to: Address,
    /// Value in wei.
    pub value: u128,
    /// Chain ID (EIP-155 replay protection).
    pub chain_id: u64,
}

/// A recoverable secp256k1 signature over a [`LegacyTransfer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// `r` component, big-endian.
    pub r: [u8; 32],
    /// `s` component, big-endian, low-S normalized.
    pub s: [u8; 32],
    /// Recovery id (0 or 1).
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// `r || s || recovery_id`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.recovery_id;
        out
    }

    /// Parse `r || s || recovery_id`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 65 {
            return None;
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Some(Self {
            r,
            s,
            recovery_id: bytes[64],
        })
    }
}

impl LegacyTransfer {
    /// Create a plain value transfer.
    #[must_use]
    pub const fn new(
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
        to: Address,
        value: u128,
        chain_id: u64,
    ) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            chain_id,
        }
    }

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        stream.append(&self.to.as_slice().to_vec());
        stream.append(&self.value);
        stream.append_empty_data();
    }

    /// RLP encoding covered by the signature.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        stream.out().to_vec()
    }

    /// Sign with a raw secp256k1 secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is not a valid scalar.
    pub fn sign(&self, secret: &SecretKey) -> Result<RecoverableSignature> {
        sign_payload(&self.signing_payload(), secret)
    }

    /// EIP-155 `v` for a given recovery id.
    #[must_use]
    pub fn v(&self, recovery_id: u8) -> u64 {
        self.chain_id
            .saturating_mul(2)
            .saturating_add(35 + u64::from(recovery_id))
    }

    /// RLP wire encoding with the signature attached.
    #[must_use]
    pub fn encode_signed(&self, signature: &RecoverableSignature) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&self.v(signature.recovery_id));
        stream.append(&trim_leading_zeros(&signature.r).to_vec());
        stream.append(&trim_leading_zeros(&signature.s).to_vec());
        stream.out().to_vec()
    }
}

/// Sign keccak256(`payload`) with a raw secp256k1 secret.
///
/// # Errors
///
/// Returns an error if the secret is not a valid scalar.
pub fn sign_payload(payload: &[u8], secret: &SecretKey) -> Result<RecoverableSignature> {
    let signing_key = signing_key(secret)?;
    let hash = keccak256(payload);
    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(hash.as_slice())
        .map_err(|e| Error::Derivation(format!("signing failed: {e}")))?;

    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    Ok(RecoverableSignature {
        r,
        s,
        recovery_id: recovery_id.to_byte(),
    })
}

/// Address controlled by a raw secp256k1 secret.
///
/// # Errors
///
/// Returns an error if the secret is not a valid scalar.
pub fn secret_address(secret: &SecretKey) -> Result<Address> {
    let public_key = signing_key(secret)?.verifying_key().to_encoded_point(false);
    let raw = &public_key.as_bytes()[1..];
    Ok(Address::from_raw_public_key(raw))
}

fn signing_key(secret: &SecretKey) -> Result<SigningKey> {
    SigningKey::from_slice(secret.expose())
        .map_err(|_| Error::Derivation("invalid secp256k1 secret key".into()))
}

/// Recover the checksummed signer address of `payload`.
#[must_use]
pub fn recover_signer(payload: &[u8], signature: &RecoverableSignature) -> Option<String> {
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&signature.r);
    rs[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&rs).ok()?;
    // High-S signatures are malleable; only the normalized form is accepted.
    if sig.normalize_s().is_some() {
        return None;
    }
    let recovery_id = RecoveryId::from_byte(signature.recovery_id)?;
    let hash = keccak256(payload);
    let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &sig, recovery_id).ok()?;
    Some(public_key_to_address(key.to_encoded_point(false).as_bytes()))
}

/// Keccak-256 transaction hash of the wire bytes, `0x`-prefixed.
#[must_use]
pub fn transaction_hash(wire: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(wire)))
}

/// Trim leading zeros from bytes.
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first_nonzero..]
}
