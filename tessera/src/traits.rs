//! The per-chain abstraction behind derivation, building and signing.

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::keypair::Keypair;
use crate::network::NetworkParams;
use crate::transaction::{SignedTransaction, UnsignedTransaction};
use crate::wallet::Seed;

/// Everything the core needs from one chain.
///
/// Callers hold a `dyn ChainScheme` per chain and never branch on curve or
/// encoding details. All methods are synchronous and free of I/O.
pub trait ChainScheme: Send + Sync {
    /// The chain this scheme implements.
    fn chain(&self) -> Chain;

    /// Derive the keypair at `index`. Pure and deterministic.
    fn derive_keypair(&self, seed: &Seed, index: u32) -> Result<Keypair>;

    /// Structural address check, no network round-trip.
    fn is_valid_address(&self, address: &str) -> bool;

    /// Assemble an unsigned transfer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if either address is malformed,
    /// [`Error::InvalidAmount`] if `amount` is zero or not representable,
    /// [`Error::InvalidNetworkParams`] if `params` belong to another chain.
    fn build_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: u128,
        params: &NetworkParams,
    ) -> Result<UnsignedTransaction>;

    /// Sign `tx` with `keypair`.
    ///
    /// # Errors
    ///
    /// [`Error::SigningKeyMismatch`] if the key does not belong to the sender.
    fn sign(&self, tx: &UnsignedTransaction, keypair: &Keypair) -> Result<SignedTransaction>;

    /// Check `signature` over `payload` against the sender's address.
    fn verify(&self, sender: &str, payload: &[u8], signature: &[u8]) -> bool;

    /// Check a signed transaction against its own canonical payload.
    fn verify_transaction(&self, tx: &SignedTransaction) -> bool {
        self.verify(
            tx.unsigned().sender(),
            tx.unsigned().signing_payload(),
            tx.signature(),
        )
    }
}

/// Shared precondition for [`ChainScheme::sign`]: the keypair is on the
/// transaction's chain and its secret controls the sender.
///
/// `key_address` is the address derived from the keypair's secret, never the
/// address recorded on the keypair. `controls_sender` is the chain's verdict
/// on whether `key_address` names the sender account, since address
/// spellings are chain specific.
///
/// # Errors
///
/// Returns [`Error::SigningKeyMismatch`] otherwise.
pub fn ensure_signer(
    tx: &UnsignedTransaction,
    keypair: &Keypair,
    key_address: &str,
    controls_sender: bool,
) -> Result<()> {
    if keypair.chain() != tx.chain() || !controls_sender {
        return Err(Error::SigningKeyMismatch {
            sender: tx.sender().to_string(),
            key_address: key_address.to_string(),
        });
    }
    Ok(())
}
