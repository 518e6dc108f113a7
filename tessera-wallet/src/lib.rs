//! # Tessera Wallet
//!
//! The stateful half of Tessera: a [`KeypairRegistry`] holding every
//! derived keypair per chain, the storage layout it persists through any
//! [`tessera::KeyValueStore`], TOML configuration, and the [`SendFlow`]
//! that takes a transfer from network parameters to a confirmed state.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tessera::{Chain, Wallet};
//! use tessera_wallet::{KeypairRegistry, MemoryStore, WalletConfig};
//!
//! # async fn run() -> tessera::Result<()> {
//! let config = WalletConfig::from_toml_str("")?;
//! let wallet = Wallet::generate(12, None)?;
//! let registry = KeypairRegistry::from_config(wallet, &config, Arc::new(MemoryStore::new()));
//!
//! let address = registry.add_wallet(Chain::Solana).await?;
//! assert_eq!(registry.active(Chain::Solana).await?, Some(address));
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

pub mod config;
pub mod flow;
pub mod registry;
pub mod store;

pub use config::{EthereumConfig, SolanaConfig, WalletConfig};
pub use flow::{FeePolicy, SendFlow};
pub use registry::KeypairRegistry;
pub use store::MemoryStore;
