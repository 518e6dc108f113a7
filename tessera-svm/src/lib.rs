//! Solana-style chain support for Tessera.
//!
//! Derives ed25519 keypairs with SLIP-0010 (hardened segments only),
//! validates base58 addresses, and builds and signs legacy-format system
//! program transfers. Everything is exposed to the wallet through [`SvmScheme`].

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
mod slip10;
mod transaction;

pub use address::{encode_address, is_valid_address, parse_address};
pub use derivation_style::{DerivationStyle, ParseDerivationStyleError};
pub use deriver::Deriver;
pub use scheme::{SvmScheme, DEFAULT_LAMPORTS_PER_SIGNATURE};
pub use slip10::{format_path, DerivedKey, HARDENED};
pub use transaction::{
    encode_transaction, secret_public_key, sign_message, verify_message, SystemTransfer,
    SYSTEM_PROGRAM_ID,
};
