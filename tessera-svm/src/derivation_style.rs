//! Derivation path styles for different Solana wallet software.
//!
//! Every style is hardened at every level, as SLIP-0010 requires for ed25519.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slip10::format_path;

const PURPOSE: u32 = 44;
const COIN_TYPE: u32 = 501;

/// Solana derivation path styles for different wallet software.
///
/// # Path Specifications
///
/// - **Standard (Phantom/Backpack)**: `m/44'/501'/{index}'/0'`
/// - **Trust**: `m/44'/501'/{index}'`
/// - **Ledger Live**: `m/44'/501'/{index}'/0'/0'`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum DerivationStyle {
    /// Standard BIP44-Change path used by Phantom and Backpack.
    ///
    /// Path format: `m/44'/501'/{index}'/0'`
    #[default]
    Standard,

    /// Trust Wallet / Ledger native derivation path.
    ///
    /// Path format: `m/44'/501'/{index}'`
    Trust,

    /// Ledger Live derivation path (account-based).
    ///
    /// Path format: `m/44'/501'/{index}'/0'/0'`
    LedgerLive,
}

impl DerivationStyle {
    /// Path segments for `index`, before hardening.
    #[must_use]
    pub fn segments(self, index: u32) -> Vec<u32> {
        match self {
            Self::Standard => vec![PURPOSE, COIN_TYPE, index, 0],
            Self::Trust => vec![PURPOSE, COIN_TYPE, index],
            Self::LedgerLive => vec![PURPOSE, COIN_TYPE, index, 0, 0],
        }
    }

    /// Generate the derivation path string for a given index.
    #[must_use]
    pub fn path(self, index: u32) -> String {
        format_path(&self.segments(index))
    }

    /// Get the human-readable name of this derivation style.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard (Phantom/Backpack)",
            Self::Trust => "Trust (Ledger/Keystone)",
            Self::LedgerLive => "Ledger Live",
        }
    }

    /// Get a short identifier, as used in configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Trust => "trust",
            Self::LedgerLive => "ledger-live",
        }
    }

    /// Get all available derivation styles.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Standard, Self::Trust, Self::LedgerLive]
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
            "standard" | "phantom" | "backpack" => Ok(Self::Standard),
            "trust" | "ledger" | "keystone" => Ok(Self::Trust),
            "ledger-live" | "ledgerlive" | "live" => Ok(Self::LedgerLive),
            _ => Err(ParseDerivationStyleError(s.into())),
        }
    }
}

/// Error returned when parsing an invalid derivation style string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid derivation style '{0}', expected one of: standard, trust, ledger-live")]
pub struct ParseDerivationStyleError(pub(crate) String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(DerivationStyle::Standard.path(0), "m/44'/501'/0'/0'");
        assert_eq!(DerivationStyle::Standard.path(5), "m/44'/501'/5'/0'");
        assert_eq!(DerivationStyle::Trust.path(2), "m/44'/501'/2'");
        assert_eq!(DerivationStyle::LedgerLive.path(1), "m/44'/501'/1'/0'/0'");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "phantom".parse::<DerivationStyle>().unwrap(),
            DerivationStyle::Standard
        );
        for style in DerivationStyle::all() {
            assert_eq!(style.id().parse::<DerivationStyle>().unwrap(), *style);
        }
        assert!("legacy".parse::<DerivationStyle>().is_err());
    }

    #[test]
    fn test_serde_ids_match() {
        #[derive(Deserialize)]
        struct Holder {
            style: DerivationStyle,
        }
        let holder: Holder = serde_json::from_str(r#"{"style":"ledger-live"}"#).unwrap();
        assert_eq!(holder.style, DerivationStyle::LedgerLive);
    }
}
