//! Unsigned and signed transfer transactions.
//!
//! Both types are chain-agnostic shells around the canonical bytes that the
//! chain crates produce. An [`UnsignedTransaction`] is built fresh per send
//! attempt; a [`SignedTransaction`] is handed to the broadcaster exactly once.

use crate::chain::Chain;
use crate::network::NetworkParams;

/// A transfer ready to be signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    chain: Chain,
    sender: String,
    recipient: String,
    amount: u128,
    params: NetworkParams,
    payload: Vec<u8>,
}

impl UnsignedTransaction {
    /// Wrap the canonical signing payload with the values it encodes.
    ///
    /// # Arguments
    ///
    /// * `chain` - Chain the transfer targets
    /// * `sender` - Public identifier of the sending keypair
    /// * `recipient` - Validated recipient address
    /// * `amount` - Transfer value in minor units
    /// * `params` - Fee and freshness the payload was built with
    /// * `payload` - Canonical bytes the signature covers
    #[must_use]
    pub fn new(
        chain: Chain,
        sender: String,
        recipient: String,
        amount: u128,
        params: NetworkParams,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            chain,
            sender,
            recipient,
            amount,
            params,
            payload,
        }
    }

    /// Target chain.
    #[inline]
    #[must_use]
    pub const fn chain(&self) -> Chain {
        self.chain
    }

    /// Declared sender.
    #[inline]
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Recipient address.
    #[inline]
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Amount in minor units.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> u128 {
        self.amount
    }

    /// Fee and freshness parameters.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Canonical encoding covered by the signature.
    #[inline]
    #[must_use]
    pub fn signing_payload(&self) -> &[u8] {
        &self.payload
    }
}

/// A signed transfer in the chain's wire encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    unsigned: UnsignedTransaction,
    signature: Vec<u8>,
    wire: Vec<u8>,
    reference: String,
}

impl SignedTransaction {
    /// Attach a signature and wire encoding to an unsigned transaction.
    #[must_use]
    pub fn new(
        unsigned: UnsignedTransaction,
        signature: Vec<u8>,
        wire: Vec<u8>,
        reference: String,
    ) -> Self {
        Self {
            unsigned,
            signature,
            wire,
            reference,
        }
    }

    /// The transaction that was signed.
    #[inline]
    #[must_use]
    pub const fn unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }

    /// Target chain.
    #[inline]
    #[must_use]
    pub const fn chain(&self) -> Chain {
        self.unsigned.chain
    }

    /// Raw signature bytes (`r || s || recid` or the 64-byte ed25519 signature).
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Bytes to broadcast.
    #[inline]
    #[must_use]
    pub fn wire_bytes(&self) -> &[u8] {
        &self.wire
    }

    /// Identifier the network will know this transaction by.
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }
}
