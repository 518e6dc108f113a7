//! Network parameters and the collaborator traits the core talks to.
//!
//! Storage, network-parameter lookup and broadcast are external services.
//! The core only sees them through these traits, so an implementation can
//! swap in encrypted storage or a different RPC transport freely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::error::Result;
use crate::transaction::SignedTransaction;

/// Short-lived reference that makes a transaction acceptable to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Freshness {
    /// Ethereum-style: account nonce observed at a recent block.
    Evm {
        /// Next nonce for the sender.
        nonce: u64,
        /// Block height the nonce was read at.
        block_number: u64,
    },
    /// Solana-style: recent blockhash and the last height it stays valid.
    Svm {
        /// Base58-encoded recent blockhash.
        blockhash: String,
        /// Last block height at which the blockhash is accepted.
        last_valid_block_height: u64,
    },
}

impl Freshness {
    /// Chain family this token belongs to.
    #[must_use]
    pub const fn chain(&self) -> Chain {
        match self {
            Self::Evm { .. } => Chain::Ethereum,
            Self::Svm { .. } => Chain::Solana,
        }
    }
}

/// Chain-specific fee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeeParams {
    /// Price per unit of work.
    Evm {
        /// Wei per gas.
        gas_price: u128,
        /// Gas units the transfer may consume.
        gas_limit: u64,
    },
    /// Flat fee per signature.
    Svm {
        /// Lamports charged per signature.
        lamports_per_signature: u64,
    },
}

impl FeeParams {
    /// Chain family these parameters belong to.
    #[must_use]
    pub const fn chain(&self) -> Chain {
        match self {
            Self::Evm { .. } => Chain::Ethereum,
            Self::Svm { .. } => Chain::Solana,
        }
    }

    /// Upper bound of the fee in minor units.
    #[must_use]
    pub fn max_fee(&self) -> u128 {
        match *self {
            Self::Evm {
                gas_price,
                gas_limit,
            } => gas_price.saturating_mul(u128::from(gas_limit)),
            Self::Svm {
                lamports_per_signature,
            } => u128::from(lamports_per_signature),
        }
    }
}

/// Everything the builder needs from the network for one send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Freshness token.
    pub freshness: Freshness,
    /// Fee parameters.
    pub fee: FeeParams,
}

impl NetworkParams {
    /// Bundle freshness and fee parameters.
    #[must_use]
    pub const fn new(freshness: Freshness, fee: FeeParams) -> Self {
        Self { freshness, fee }
    }

    /// The chain both halves belong to, or `None` if they disagree.
    #[must_use]
    pub fn chain(&self) -> Option<Chain> {
        let chain = self.freshness.chain();
        (chain == self.fee.chain()).then_some(chain)
    }
}

/// Why the broadcast collaborator refused a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The freshness token expired; rebuild with fresh parameters.
    StaleParams(String),
    /// Any other rejection, passed through verbatim.
    Other(String),
}

/// Immediate result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The network accepted the transaction for inclusion.
    Accepted {
        /// Reference to poll with.
        reference: String,
    },
    /// The network refused the transaction.
    Rejected(RejectReason),
}

/// Observed status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// Not yet final.
    Pending,
    /// Included and final.
    Confirmed,
    /// Included but failed, or dropped.
    Failed,
}

/// Get/put key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `namespace`/`key`, replacing any previous value.
    async fn put(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()>;

    /// Fetch the value under `namespace`/`key`.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Source of fresh network parameters.
#[async_trait]
pub trait NetworkParamsSource: Send + Sync {
    /// Fetch a freshness token for `sender` on `chain`.
    async fn fetch_freshness(&self, chain: Chain, sender: &str) -> Result<Freshness>;

    /// Fetch the current fee estimate for `chain`.
    async fn fetch_fee_estimate(&self, chain: Chain) -> Result<FeeParams>;
}

/// Transaction broadcast and status lookup.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Submit a signed transaction.
    async fn submit(&self, chain: Chain, tx: &SignedTransaction) -> Result<SubmitOutcome>;

    /// Look up the status of a previously accepted transaction.
    async fn poll_status(&self, chain: Chain, reference: &str) -> Result<TxStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_chain_agreement() {
        let params = NetworkParams::new(
            Freshness::Evm {
                nonce: 1,
                block_number: 100,
            },
            FeeParams::Evm {
                gas_price: 2,
                gas_limit: 21_000,
            },
        );
        assert_eq!(params.chain(), Some(Chain::Ethereum));
        assert_eq!(params.fee.max_fee(), 42_000);

        let mixed = NetworkParams::new(
            params.freshness.clone(),
            FeeParams::Svm {
                lamports_per_signature: 5_000,
            },
        );
        assert_eq!(mixed.chain(), None);
    }

    #[test]
    fn test_params_serde_shape() {
        let params = NetworkParams::new(
            Freshness::Svm {
                blockhash: "11111111111111111111111111111111".into(),
                last_valid_block_height: 9,
            },
            FeeParams::Svm {
                lamports_per_signature: 5_000,
            },
        );
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["freshness"]["kind"], "svm");
        assert_eq!(json["fee"]["lamports_per_signature"], 5_000);
        let back: NetworkParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }
}
