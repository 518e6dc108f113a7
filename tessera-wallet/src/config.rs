//! Wallet configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! submit_timeout_ms = 30000
//!
//! [ethereum]
//! chain_id = 11155111
//! derivation_style = "account-hardened"
//! gas_limit = 21000
//!
//! [solana]
//! derivation_style = "standard"
//! lamports_per_signature = 5000
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tessera::{Chain, ChainScheme, Error, Result};
use tessera_evm::{EvmScheme, SEPOLIA_CHAIN_ID, TRANSFER_GAS_LIMIT};
use tessera_svm::{SvmScheme, DEFAULT_LAMPORTS_PER_SIGNATURE};

/// Top-level wallet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Ethereum-style chain settings.
    pub ethereum: EthereumConfig,
    /// Solana-style chain settings.
    pub solana: SolanaConfig,
    /// How long to wait for the broadcaster before recording a timeout.
    pub submit_timeout_ms: u64,
}

/// Ethereum-style chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumConfig {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Derivation path style.
    pub derivation_style: tessera_evm::DerivationStyle,
    /// Gas limit for plain transfers. Overrides the network estimate.
    pub gas_limit: u64,
    /// JSON-RPC endpoint handed to the network collaborator.
    pub rpc_url: String,
}

/// Solana-style chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolanaConfig {
    /// Derivation path style.
    pub derivation_style: tessera_svm::DerivationStyle,
    /// Flat fee per signature, in lamports.
    pub lamports_per_signature: u64,
    /// JSON-RPC endpoint handed to the network collaborator.
    pub rpc_url: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            ethereum: EthereumConfig::default(),
            solana: SolanaConfig::default(),
            submit_timeout_ms: 30_000,
        }
    }
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            derivation_style: tessera_evm::DerivationStyle::AccountHardened,
            gas_limit: TRANSFER_GAS_LIMIT,
            rpc_url: "https://eth-sepolia.g.alchemy.com/v2/demo".into(),
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            derivation_style: tessera_svm::DerivationStyle::Standard,
            lamports_per_signature: DEFAULT_LAMPORTS_PER_SIGNATURE,
            rpc_url: "https://api.mainnet-beta.solana.com".into(),
        }
    }
}

impl WalletConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Submission timeout.
    #[must_use]
    pub const fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    /// RPC endpoint for `chain`.
    #[must_use]
    pub fn rpc_url(&self, chain: Chain) -> &str {
        match chain {
            Chain::Ethereum => &self.ethereum.rpc_url,
            Chain::Solana => &self.solana.rpc_url,
        }
    }

    /// The chain schemes this configuration describes, one per chain.
    #[must_use]
    pub fn schemes(&self) -> Vec<Arc<dyn ChainScheme>> {
        vec![
            Arc::new(EvmScheme::new(
                self.ethereum.chain_id,
                self.ethereum.derivation_style,
            )),
            Arc::new(SvmScheme::new(self.solana.derivation_style)),
        ]
    }
}
