//! Per-chain registry of derived keypairs.
//!
//! Each chain's entries form an append-only list whose position is the
//! derivation index. `add_wallet` holds the chain's lock across "read next
//! index, derive, persist, append", so concurrent calls never share an index.
//! Different chains have separate locks and proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tessera::{
    Chain, ChainScheme, Error, KeyValueStore, Keypair, Result, SignedTransaction,
    UnsignedTransaction, Wallet,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::WalletConfig;
use crate::store::{
    decode_addresses, encode_addresses, encode_secret, secrets_namespace, wallets_namespace,
    ACTIVE_KEY, ADDRESSES_KEY,
};

#[derive(Default)]
struct ChainState {
    keypairs: Vec<Keypair>,
    active: Option<usize>,
}

impl ChainState {
    fn addresses(&self) -> Vec<String> {
        self.keypairs
            .iter()
            .map(|k| k.address().to_string())
            .collect()
    }

    fn position(&self, address: &str) -> Option<usize> {
        self.keypairs.iter().position(|k| k.address() == address)
    }
}

struct ChainSlot {
    scheme: Arc<dyn ChainScheme>,
    state: Mutex<ChainState>,
}

/// Owner of every derived keypair.
///
/// Keypairs never leave the registry: callers see addresses, and signing
/// borrows the active keypair for the duration of one call.
pub struct KeypairRegistry {
    wallet: Wallet,
    store: Arc<dyn KeyValueStore>,
    chains: HashMap<Chain, ChainSlot>,
}

impl KeypairRegistry {
    /// Create an empty registry over `wallet`, one slot per scheme.
    #[must_use]
    pub fn new(
        wallet: Wallet,
        schemes: Vec<Arc<dyn ChainScheme>>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let chains = schemes
            .into_iter()
            .map(|scheme| {
                let slot = ChainSlot {
                    scheme,
                    state: Mutex::new(ChainState::default()),
                };
                (slot.scheme.chain(), slot)
            })
            .collect();
        Self {
            wallet,
            store,
            chains,
        }
    }

    /// Create an empty registry with the schemes `config` describes.
    #[must_use]
    pub fn from_config(
        wallet: Wallet,
        config: &WalletConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::new(wallet, config.schemes(), store)
    }

    fn slot(&self, chain: Chain) -> Result<&ChainSlot> {
        self.chains.get(&chain).ok_or(Error::UnsupportedChain(chain))
    }

    /// The scheme registered for `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChain`] if none is registered.
    pub fn scheme(&self, chain: Chain) -> Result<&dyn ChainScheme> {
        Ok(self.slot(chain)?.scheme.as_ref())
    }

    /// Derive the next keypair for `chain`, persist it, and make it active.
    ///
    /// Writes go secret, active marker, then address list. The address list
    /// is the commit point: a persisted address always has its secret, and an
    /// active marker naming an address missing from the list is ignored on
    /// [`Self::restore`]. Nothing is appended if persistence fails.
    ///
    /// # Errors
    ///
    /// Returns derivation or storage errors.
    pub async fn add_wallet(&self, chain: Chain) -> Result<String> {
        let slot = self.slot(chain)?;
        let mut state = slot.state.lock().await;

        let index = u32::try_from(state.keypairs.len())
            .map_err(|_| Error::Derivation(format!("{chain} account index space exhausted")))?;
        let keypair = slot.scheme.derive_keypair(self.wallet.seed(), index)?;
        let address = keypair.address().to_string();

        let mut addresses = state.addresses();
        addresses.push(address.clone());

        self.store
            .put(
                &secrets_namespace(chain),
                &address,
                encode_secret(keypair.secret()).to_vec(),
            )
            .await?;
        self.store
            .put(
                &wallets_namespace(chain),
                ACTIVE_KEY,
                address.clone().into_bytes(),
            )
            .await?;
        self.store
            .put(
                &wallets_namespace(chain),
                ADDRESSES_KEY,
                encode_addresses(&addresses)?,
            )
            .await?;

        state.keypairs.push(keypair);
        state.active = Some(state.keypairs.len() - 1);
        info!(%chain, index, %address, "added wallet");
        Ok(address)
    }

    /// Addresses for `chain`, in derivation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChain`] if no scheme is registered.
    pub async fn list_wallets(&self, chain: Chain) -> Result<Vec<String>> {
        Ok(self.slot(chain)?.state.lock().await.addresses())
    }

    /// The active address for `chain`, if any wallet was added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChain`] if no scheme is registered.
    pub async fn active(&self, chain: Chain) -> Result<Option<String>> {
        let state = self.slot(chain)?.state.lock().await;
        Ok(state
            .active
            .map(|i| state.keypairs[i].address().to_string()))
    }

    /// Make `address` the wallet that signing applies to on `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownWallet`] if the address was never added.
    pub async fn select_active(&self, chain: Chain, address: &str) -> Result<()> {
        let slot = self.slot(chain)?;
        let mut state = slot.state.lock().await;
        let position = state.position(address).ok_or_else(|| Error::UnknownWallet {
            chain,
            address: address.to_string(),
        })?;

        self.store
            .put(
                &wallets_namespace(chain),
                ACTIVE_KEY,
                address.as_bytes().to_vec(),
            )
            .await?;
        state.active = Some(position);
        info!(%chain, %address, "selected active wallet");
        Ok(())
    }

    /// Reload every chain from storage, re-deriving each persisted index.
    ///
    /// Every chain is validated before any is replaced, so a failed restore
    /// leaves the in-memory state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageCorrupted`] if a persisted address does not
    /// match the keypair re-derived at its index.
    pub async fn restore(&self) -> Result<()> {
        let mut chains: Vec<_> = self.chains.iter().collect();
        chains.sort_by_key(|(chain, _)| **chain);

        let mut guards = Vec::with_capacity(chains.len());
        for (chain, slot) in &chains {
            guards.push((**chain, slot.state.lock().await));
        }

        let mut staged = Vec::with_capacity(chains.len());
        for (chain, slot) in &chains {
            staged.push(self.load_chain(**chain, slot.scheme.as_ref()).await?);
        }

        for ((chain, state), restored) in guards.iter_mut().zip(staged) {
            let chain = *chain;
            info!(%chain, count = restored.keypairs.len(), "restored wallets");
            **state = restored;
        }
        Ok(())
    }

    async fn load_chain(&self, chain: Chain, scheme: &dyn ChainScheme) -> Result<ChainState> {
        let namespace = wallets_namespace(chain);

        let addresses = match self.store.get(&namespace, ADDRESSES_KEY).await? {
            Some(bytes) => decode_addresses(chain, &bytes)?,
            None => Vec::new(),
        };

        let mut keypairs = Vec::with_capacity(addresses.len());
        for (i, address) in addresses.iter().enumerate() {
            let index =
                u32::try_from(i).map_err(|_| Error::StorageCorrupted { chain, index: u32::MAX })?;
            let keypair = scheme.derive_keypair(self.wallet.seed(), index)?;
            if keypair.address() != address {
                warn!(%chain, index, %address, "persisted wallet does not re-derive");
                return Err(Error::StorageCorrupted { chain, index });
            }
            keypairs.push(keypair);
        }

        let active = self
            .store
            .get(&namespace, ACTIVE_KEY)
            .await?
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|address| addresses.iter().position(|a| *a == address))
            .or_else(|| keypairs.len().checked_sub(1));

        Ok(ChainState { keypairs, active })
    }

    /// Sign `tx` with the active keypair of its chain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownWallet`] if no wallet is active, or
    /// [`Error::SigningKeyMismatch`] if the active wallet is not the sender.
    pub async fn sign(&self, tx: &UnsignedTransaction) -> Result<SignedTransaction> {
        let chain = tx.chain();
        let slot = self.slot(chain)?;
        let state = slot.state.lock().await;
        let keypair = state
            .active
            .map(|i| &state.keypairs[i])
            .ok_or_else(|| Error::UnknownWallet {
                chain,
                address: tx.sender().to_string(),
            })?;

        let signed = slot.scheme.sign(tx, keypair)?;
        debug!(%chain, reference = %signed.reference(), "signed transaction");
        Ok(signed)
    }
}

impl core::fmt::Debug for KeypairRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut chains: Vec<_> = self.chains.keys().collect();
        chains.sort();
        f.debug_struct("KeypairRegistry")
            .field("chains", &chains)
            .finish_non_exhaustive()
    }
}
