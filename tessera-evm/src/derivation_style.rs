//! Derivation path styles for different wallet software.
//!
//! Different wallet software (`MetaMask`, Ledger, Trezor) use different BIP-44
//! derivation paths. This module provides predefined styles for compatibility.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ethereum derivation path styles for different wallet software.
///
/// # Path Specifications
///
/// - **MetaMask/Trezor**: Standard BIP-44 `m/44'/60'/0'/0/{index}`
/// - **Ledger Live**: Account-based `m/44'/60'/{index}'/0/0`
/// - **Ledger Legacy**: MEW/MyCrypto compatible `m/44'/60'/0'/{index}`
/// - **Account Hardened** (default): `m/44'/60'/{index}'/0'`, hardening
///   every level below the coin type as Tessera's browser wallet always has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum DerivationStyle {
    /// Standard BIP-44 path used by `MetaMask` and Trezor.
    ///
    /// Path format: `m/44'/60'/0'/0/{index}`
    Standard,

    /// Ledger Live derivation path.
    ///
    /// Path format: `m/44'/60'/{index}'/0/0`
    ///
    /// Ledger Live treats each index as a separate account.
    LedgerLive,

    /// Ledger Legacy derivation path (MEW/MyCrypto compatible).
    ///
    /// Path format: `m/44'/60'/0'/{index}`
    LedgerLegacy,

    /// Hardened account and change levels.
    ///
    /// Path format: `m/44'/60'/{index}'/0'`
    #[default]
    AccountHardened,
}

impl DerivationStyle {
    /// Generate the derivation path string for a given index.
    #[must_use]
    pub fn path(self, index: u32) -> String {
        match self {
            Self::Standard => format!("m/44'/60'/0'/0/{index}"),
            Self::LedgerLive => format!("m/44'/60'/{index}'/0/0"),
            Self::LedgerLegacy => format!("m/44'/60'/0'/{index}"),
            Self::AccountHardened => format!("m/44'/60'/{index}'/0'"),
        }
    }

    /// Get the human-readable name of this derivation style.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard (MetaMask/Trezor)",
            Self::LedgerLive => "Ledger Live",
            Self::LedgerLegacy => "Ledger Legacy (MEW/MyCrypto)",
            Self::AccountHardened => "Account Hardened",
        }
    }

    /// Get a short identifier, as used in configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::LedgerLive => "ledger-live",
            Self::LedgerLegacy => "ledger-legacy",
            Self::AccountHardened => "account-hardened",
        }
    }

    /// Get all available derivation styles.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Standard,
            Self::LedgerLive,
            Self::LedgerLegacy,
            Self::AccountHardened,
        ]
    }
}

impl fmt::Display for DerivationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DerivationStyle {
    type Err = ParseDerivationStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "metamask" | "trezor" | "bip44" => Ok(Self::Standard),
            "ledger-live" | "ledgerlive" | "live" => Ok(Self::LedgerLive),
            "ledger-legacy" | "ledgerlegacy" | "legacy" | "mew" | "mycrypto" => {
                Ok(Self::LedgerLegacy)
            }
            "account-hardened" | "hardened" => Ok(Self::AccountHardened),
            _ => Err(ParseDerivationStyleError(s.into())),
        }
    }
}

/// Error returned when parsing an invalid derivation style string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid derivation style '{0}', expected one of: standard, ledger-live, ledger-legacy, account-hardened"
)]
pub struct ParseDerivationStyleError(pub(crate) String);
