//! [`ChainScheme`] implementation for Ethereum-style chains.

use tessera::{
    traits::ensure_signer, Chain, ChainScheme, Error, FeeParams, Freshness, Keypair,
    NetworkParams, Result, Seed, SignedTransaction, UnsignedTransaction,
};
use tracing::debug;

use crate::address::{is_valid_address, parse_address};
use crate::derivation_style::DerivationStyle;
use crate::deriver::Deriver;
use crate::transaction::{
    recover_signer, secret_address, transaction_hash, LegacyTransfer, RecoverableSignature,
};

/// Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Ethereum-style chain: secp256k1 keys, gas-priced EIP-155 transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmScheme {
    chain_id: u64,
    style: DerivationStyle,
}

impl EvmScheme {
    /// Create a scheme for `chain_id` deriving keys with `style`.
    #[must_use]
    pub const fn new(chain_id: u64, style: DerivationStyle) -> Self {
        Self { chain_id, style }
    }

    /// EIP-155 chain id.
    #[inline]
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Derivation style.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> DerivationStyle {
        self.style
    }

    /// Rebuild the transfer described by `tx`.
    fn transfer_for(&self, tx: &UnsignedTransaction) -> Result<LegacyTransfer> {
        let to = parse_address(tx.recipient()).ok_or_else(|| Error::InvalidAddress {
            chain: Chain::Ethereum,
            address: tx.recipient().to_string(),
        })?;
        let (nonce, gas_price, gas_limit) = evm_params(tx.params())?;
        Ok(LegacyTransfer::new(
            nonce,
            gas_price,
            gas_limit,
            to,
            tx.amount(),
            self.chain_id,
        ))
    }
}

impl Default for EvmScheme {
    fn default() -> Self {
        Self::new(SEPOLIA_CHAIN_ID, DerivationStyle::default())
    }
}

fn evm_params(params: &NetworkParams) -> Result<(u64, u128, u64)> {
    match (&params.freshness, params.fee) {
        (
            Freshness::Evm { nonce, .. },
            FeeParams::Evm {
                gas_price,
                gas_limit,
            },
        ) => Ok((*nonce, gas_price, gas_limit)),
        _ => Err(Error::InvalidNetworkParams(
            "expected ethereum freshness and fee parameters".into(),
        )),
    }
}

impl ChainScheme for EvmScheme {
    fn chain(&self) -> Chain {
        Chain::Ethereum
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
        for address in [recipient, sender] {
            if !is_valid_address(address) {
                return Err(Error::InvalidAddress {
                    chain: Chain::Ethereum,
                    address: address.to_string(),
                });
            }
        }
        if amount == 0 {
            return Err(Error::InvalidAmount("amount must be greater than zero".into()));
        }
        let (nonce, gas_price, gas_limit) = evm_params(params)?;
        let to = parse_address(recipient).ok_or_else(|| Error::InvalidAddress {
            chain: Chain::Ethereum,
            address: recipient.to_string(),
        })?;

        let transfer = LegacyTransfer::new(nonce, gas_price, gas_limit, to, amount, self.chain_id);
        debug!(
            chain_id = self.chain_id,
            nonce,
            gas_price = %gas_price,
            gas_limit,
            "built ethereum transfer"
        );

        Ok(UnsignedTransaction::new(
            Chain::Ethereum,
            sender.to_string(),
            recipient.to_string(),
            amount,
            params.clone(),
            transfer.signing_payload(),
        ))
    }

    fn sign(&self, tx: &UnsignedTransaction, keypair: &Keypair) -> Result<SignedTransaction> {
        let key_address = secret_address(keypair.secret())?;
        let controls_sender = parse_address(tx.sender()) == Some(key_address);
        ensure_signer(tx, keypair, &key_address.to_checksum(None), controls_sender)?;
        let transfer = self.transfer_for(tx)?;
        if transfer.signing_payload() != tx.signing_payload() {
            return Err(Error::InvalidNetworkParams(format!(
                "transaction was not built for chain id {}",
                self.chain_id
            )));
        }

        let signature = transfer.sign(keypair.secret())?;
        let wire = transfer.encode_signed(&signature);
        let reference = transaction_hash(&wire);
        debug!(sender = %tx.sender(), %reference, "signed ethereum transfer");

        Ok(SignedTransaction::new(
            tx.clone(),
            signature.to_bytes().to_vec(),
            wire,
            reference,
        ))
    }

    fn verify(&self, sender: &str, payload: &[u8], signature: &[u8]) -> bool {
        let Some(expected) = parse_address(sender) else {
            return false;
        };
        RecoverableSignature::from_bytes(signature)
            .and_then(|sig| recover_signer(payload, &sig))
            .and_then(|signer| parse_address(&signer))
            .is_some_and(|signer| signer == expected)
    }
}
