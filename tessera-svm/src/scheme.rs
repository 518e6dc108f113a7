//! [`ChainScheme`] implementation for Solana-style chains.

use tessera::{
    traits::ensure_signer, Chain, ChainScheme, Error, FeeParams, Freshness, Keypair,
    NetworkParams, Result, Seed, SignedTransaction, UnsignedTransaction,
};
use tracing::debug;

use crate::address::{encode_address, is_valid_address, parse_address};
use crate::derivation_style::DerivationStyle;
use crate::deriver::Deriver;
use crate::transaction::{
    encode_transaction, secret_public_key, sign_message, verify_message, SystemTransfer,
};

/// Default flat fee per signature, in lamports.
pub const DEFAULT_LAMPORTS_PER_SIGNATURE: u64 = 5_000;

/// Solana-style chain: ed25519 keys, flat-fee system transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvmScheme {
    style: DerivationStyle,
}

impl SvmScheme {
    /// Create a scheme deriving keys with `style`.
    #[must_use]
    pub const fn new(style: DerivationStyle) -> Self {
        Self { style }
    }

    /// Derivation style.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> DerivationStyle {
        self.style
    }
}

fn invalid_address(address: &str) -> Error {
    Error::InvalidAddress {
        chain: Chain::Solana,
        address: address.to_string(),
    }
}

fn recent_blockhash(params: &NetworkParams) -> Result<[u8; 32]> {
    match (&params.freshness, params.fee) {
        (Freshness::Svm { blockhash, .. }, FeeParams::Svm { .. }) => parse_address(blockhash)
            .ok_or_else(|| {
                Error::InvalidNetworkParams(format!("blockhash '{blockhash}' is not 32 base58 bytes"))
            }),
        _ => Err(Error::InvalidNetworkParams(
            "expected solana freshness and fee parameters".into(),
        )),
    }
}

/// Rebuild the system transfer described by `tx`.
fn transfer_for(tx: &UnsignedTransaction) -> Result<SystemTransfer> {
    let from = parse_address(tx.sender()).ok_or_else(|| invalid_address(tx.sender()))?;
    let to = parse_address(tx.recipient()).ok_or_else(|| invalid_address(tx.recipient()))?;
    let lamports = u64::try_from(tx.amount())
        .map_err(|_| Error::InvalidAmount(format!("{} lamports exceeds u64", tx.amount())))?;
    Ok(SystemTransfer::new(from, to, lamports, recent_blockhash(tx.params())?))
}

impl ChainScheme for SvmScheme {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    fn derive_keypair(&self, seed: &Seed, index: u32) -> Result<Keypair> {
        Deriver::new(seed, self.style).derive(index)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        is_valid_address(address)
    }

    fn build_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: u128,
        params: &NetworkParams,
    ) -> Result<UnsignedTransaction> {
        let to = parse_address(recipient).ok_or_else(|| invalid_address(recipient))?;
        let from = parse_address(sender).ok_or_else(|| invalid_address(sender))?;
        if amount == 0 {
            return Err(Error::InvalidAmount("amount must be greater than zero".into()));
        }
        let lamports = u64::try_from(amount)
            .map_err(|_| Error::InvalidAmount(format!("{amount} lamports exceeds u64")))?;
        let blockhash = recent_blockhash(params)?;

        let message = SystemTransfer::new(from, to, lamports, blockhash).message();
        debug!(lamports, self_transfer = from == to, "built solana transfer");

        Ok(UnsignedTransaction::new(
            Chain::Solana,
            sender.to_string(),
            recipient.to_string(),
            amount,
            params.clone(),
            message,
        ))
    }

    fn sign(&self, tx: &UnsignedTransaction, keypair: &Keypair) -> Result<SignedTransaction> {
        let key = secret_public_key(keypair.secret());
        let controls_sender = parse_address(tx.sender()) == Some(key);
        ensure_signer(tx, keypair, &encode_address(&key), controls_sender)?;
        let message = transfer_for(tx)?.message();
        if message != tx.signing_payload() {
            return Err(Error::InvalidNetworkParams(
                "signing payload does not match transaction fields".into(),
            ));
        }

        let signature = sign_message(&message, keypair.secret());
        let wire = encode_transaction(&signature, &message);
        let reference = bs58::encode(signature).into_string();
        debug!(sender = %tx.sender(), %reference, "signed solana transfer");

        Ok(SignedTransaction::new(
            tx.clone(),
            signature.to_vec(),
            wire,
            reference,
        ))
    }

    fn verify(&self, sender: &str, payload: &[u8], signature: &[u8]) -> bool {
        parse_address(sender).is_some_and(|key| verify_message(&key, payload, signature))
    }
}
