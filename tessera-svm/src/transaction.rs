//! Legacy-format system program transfers.
//!
//! Message layout:
//!
//! ```text
//! header        [num_required_signatures=1, num_readonly_signed=0, num_readonly_unsigned=1]
//! account_keys  shortvec<[u8; 32]>   [from, to, system_program]
//! blockhash     [u8; 32]
//! instructions  shortvec<instruction>
//!   program_id_index  u8
//!   accounts          shortvec<u8>   [from, to]
//!   data              shortvec<u8>   u32 LE 2 (Transfer) || u64 LE lamports
//! ```
//!
//! A self-transfer lists the sender once. The wire transaction is
//! `shortvec(1) || signature || message`.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use tessera::SecretKey;

/// System program id (32 zero bytes, base58 `111...1`).
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0; 32];

/// System program instruction index for `Transfer`.
const TRANSFER_INSTRUCTION: u32 = 2;

/// A single-instruction SOL transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemTransfer {
    /// Fee payer and source account.
    pub from: [u8; 32],
    /// Destination account.
    pub to: [u8; 32],
    /// Amount in lamports.
    pub lamports: u64,
    /// Recent blockhash.
    pub recent_blockhash: [u8; 32],
}

impl SystemTransfer {
    /// Create a transfer of `lamports` from `from` to `to`.
    #[must_use]
    pub const fn new(from: [u8; 32], to: [u8; 32], lamports: u64, recent_blockhash: [u8; 32]) -> Self {
        Self {
            from,
            to,
            lamports,
            recent_blockhash,
        }
    }

    /// Serialized message, the bytes the signature covers.
    #[must_use]
    pub fn message(&self) -> Vec<u8> {
        let self_transfer = self.from == self.to;
        let keys: Vec<&[u8; 32]> = if self_transfer {
            vec![&self.from, &SYSTEM_PROGRAM_ID]
        } else {
            vec![&self.from, &self.to, &SYSTEM_PROGRAM_ID]
        };
        let program_index = u8::try_from(keys.len() - 1).unwrap_or(u8::MAX);
        let to_index = if self_transfer { 0 } else { 1 };

        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&TRANSFER_INSTRUCTION.to_le_bytes());
        data.extend_from_slice(&self.lamports.to_le_bytes());

        let mut out = Vec::with_capacity(3 + 1 + keys.len() * 32 + 32 + 20);
        out.extend_from_slice(&[1, 0, 1]);
        encode_length(&mut out, keys.len());
        for key in keys {
            out.extend_from_slice(key);
        }
        out.extend_from_slice(&self.recent_blockhash);

        encode_length(&mut out, 1);
        out.push(program_index);
        encode_length(&mut out, 2);
        out.extend_from_slice(&[0, to_index]);
        encode_length(&mut out, data.len());
        out.extend_from_slice(&data);
        out
    }
}

/// Sign `message` with a raw ed25519 secret.
#[must_use]
pub fn sign_message(message: &[u8], secret: &SecretKey) -> [u8; 64] {
    SigningKey::from_bytes(secret.expose()).sign(message).to_bytes()
}

/// Public key (and address bytes) controlled by a raw ed25519 secret.
#[must_use]
pub fn secret_public_key(secret: &SecretKey) -> [u8; 32] {
    SigningKey::from_bytes(secret.expose()).verifying_key().to_bytes()
}

/// Strict ed25519 verification of `signature` over `message`.
#[must_use]
pub fn verify_message(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify_strict(message, &signature).is_ok()
}

/// Wire encoding of a single-signer transaction.
#[must_use]
pub fn encode_transaction(signature: &[u8; 64], message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 64 + message.len());
    encode_length(&mut out, 1);
    out.extend_from_slice(signature);
    out.extend_from_slice(message);
    out
}

/// Compact-u16 ("shortvec") length prefix.
fn encode_length(out: &mut Vec<u8>, len: usize) {
    let mut rem = len;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}
