#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tessera::{
    Broadcaster, Chain, Error, FeeParams, Freshness, KeyValueStore, NetworkParamsSource,
    RejectReason, Result, SignedTransaction, SubmitOutcome, TxStatus, Wallet,
};
use tessera_wallet::{KeypairRegistry, MemoryStore, WalletConfig};

pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
pub const OTHER_MNEMONIC: &str = "legal winner thank year wave sausage worth useful legal winner thank yellow";

pub const ETH_RECIPIENT: &str = "0x3535353535353535353535353535353535353535";
pub const SOL_RECIPIENT: &str = "11111111111111111111111111111112";
pub const BLOCKHASH: &str = "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi";

pub fn wallet(phrase: &str) -> Wallet {
    Wallet::from_mnemonic(phrase, None).unwrap()
}

pub fn registry(phrase: &str, store: Arc<dyn KeyValueStore>) -> KeypairRegistry {
    KeypairRegistry::from_config(wallet(phrase), &WalletConfig::default(), store)
}

pub fn memory_registry() -> KeypairRegistry {
    registry(TEST_MNEMONIC, Arc::new(MemoryStore::new()))
}

/// Store whose writes fail once `fail_after` puts have succeeded.
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryStore,
    puts: AtomicUsize,
    fail_after: usize,
}

impl FlakyStore {
    pub fn new(fail_after: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            puts: AtomicUsize::new(0),
            fail_after,
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn put(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        if self.puts.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
            return Err(Error::Storage("disk full".into()));
        }
        self.inner.put(namespace, key, value).await
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(namespace, key).await
    }
}

/// Network parameters with fixed answers and call counters.
#[derive(Debug, Default)]
pub struct StaticParams {
    pub freshness_calls: AtomicUsize,
    pub fee_calls: AtomicUsize,
}

impl StaticParams {
    pub fn calls(&self) -> usize {
        self.freshness_calls.load(Ordering::SeqCst) + self.fee_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkParamsSource for StaticParams {
    async fn fetch_freshness(&self, chain: Chain, _sender: &str) -> Result<Freshness> {
        self.freshness_calls.fetch_add(1, Ordering::SeqCst);
        Ok(match chain {
            Chain::Ethereum => Freshness::Evm {
                nonce: 7,
                block_number: 5_000_000,
            },
            Chain::Solana => Freshness::Svm {
                blockhash: BLOCKHASH.into(),
                last_valid_block_height: 300,
            },
        })
    }

    async fn fetch_fee_estimate(&self, chain: Chain) -> Result<FeeParams> {
        self.fee_calls.fetch_add(1, Ordering::SeqCst);
        Ok(match chain {
            Chain::Ethereum => FeeParams::Evm {
                gas_price: 20_000_000_000,
                gas_limit: 50_000,
            },
            Chain::Solana => FeeParams::Svm {
                lamports_per_signature: 10_000,
            },
        })
    }
}

/// What the scripted broadcaster does on submit.
#[derive(Debug, Clone)]
pub enum Script {
    Accept,
    Stale(String),
    Reject(String),
    Hang(Duration),
}

/// Broadcaster that follows a script and records what it was handed.
#[derive(Debug)]
pub struct ScriptedBroadcaster {
    script: Script,
    statuses: Mutex<VecDeque<TxStatus>>,
    pub submitted: Mutex<Vec<SignedTransaction>>,
    pub polls: AtomicUsize,
}

impl ScriptedBroadcaster {
    pub fn new(script: Script, statuses: impl IntoIterator<Item = TxStatus>) -> Self {
        Self {
            script,
            statuses: Mutex::new(statuses.into_iter().collect()),
            submitted: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl Broadcaster for ScriptedBroadcaster {
    async fn submit(&self, _chain: Chain, tx: &SignedTransaction) -> Result<SubmitOutcome> {
        self.submitted.lock().unwrap().push(tx.clone());
        match &self.script {
            Script::Accept => Ok(SubmitOutcome::Accepted {
                reference: tx.reference().to_string(),
            }),
            Script::Stale(reason) => Ok(SubmitOutcome::Rejected(RejectReason::StaleParams(
                reason.clone(),
            ))),
            Script::Reject(reason) => Ok(SubmitOutcome::Rejected(RejectReason::Other(
                reason.clone(),
            ))),
            Script::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(SubmitOutcome::Accepted {
                    reference: tx.reference().to_string(),
                })
            }
        }
    }

    async fn poll_status(&self, _chain: Chain, _reference: &str) -> Result<TxStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TxStatus::Pending))
    }
}
