//! # Tessera - HD Wallet Core
//!
//! Chain-agnostic building blocks for a multi-chain HD wallet: a BIP-39
//! [`Wallet`] and its [`Seed`], derived [`Keypair`]s, exact [`Denomination`]
//! arithmetic, unsigned and signed transactions, and the traits through which
//! the core talks to storage and network collaborators.
//!
//! Chain implementations (secp256k1 for Ethereum-style chains, ed25519 for
//! Solana-style chains) live in sibling crates and plug in via [`ChainScheme`].
//!
//! ```
//! use tessera::{Chain, Wallet};
//!
//! let wallet = Wallet::from_mnemonic(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     None,
//! )?;
//! assert_eq!(wallet.word_count(), 12);
//!
//! let eth = Chain::Ethereum.denomination();
//! assert_eq!(eth.to_minor_units("1.5")?, 1_500_000_000_000_000_000);
//! # Ok::<(), tessera::Error>(())
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
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn
)]
#![forbid(unsafe_code)]

pub mod amount;
pub mod chain;
pub mod error;
pub mod keypair;
pub mod network;
pub mod send;
pub mod traits;
pub mod transaction;
pub mod wallet;

pub use amount::{Denomination, RoundingMode};
pub use chain::Chain;
pub use error::{Error, MnemonicError, Result};
pub use keypair::{Keypair, SecretKey};
pub use network::{
    Broadcaster, FeeParams, Freshness, KeyValueStore, NetworkParams, NetworkParamsSource,
    RejectReason, SubmitOutcome, TxStatus,
};
pub use send::{SendAttempt, SendState};
pub use traits::ChainScheme;
pub use transaction::{SignedTransaction, UnsignedTransaction};
pub use wallet::{Seed, Wallet};
