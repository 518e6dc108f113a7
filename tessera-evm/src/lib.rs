//! Ethereum-style chain support for Tessera.
//!
//! Derives secp256k1 keypairs from a [`tessera::Seed`] along BIP-44 paths,
//! validates EIP-55 addresses, and builds and signs EIP-155 legacy value
//! transfers. Everything is exposed to the wallet through [`EvmScheme`].

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
#![forbid(unsafe_code)]

mod address;
mod derivation_style;
mod deriver;
mod scheme;
mod transaction;

pub use address::{is_valid_address, parse_address, public_key_to_address};
pub use derivation_style::{DerivationStyle, ParseDerivationStyleError};
pub use deriver::Deriver;
pub use scheme::{EvmScheme, SEPOLIA_CHAIN_ID};
pub use transaction::{
    recover_signer, secret_address, sign_payload, transaction_hash, LegacyTransfer, RecoverableSignature,
    TRANSFER_GAS_LIMIT,
};
