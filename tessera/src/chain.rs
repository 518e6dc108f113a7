//! Supported chains.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amount::{Denomination, RoundingMode};
use crate::error::Error;

/// The chains a wallet can derive keys and build transfers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Ethereum-style account chain (secp256k1, gas-priced fees).
    Ethereum,
    /// Solana-style account chain (ed25519, flat fees).
    Solana,
}

impl Chain {
    /// Every supported chain, in a stable order.
    pub const ALL: [Self; 2] = [Self::Ethereum, Self::Solana];

    /// Short lowercase identifier, also used as the storage namespace suffix.
    #[inline]
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Solana => "solana",
        }
    }

    /// BIP-44 coin type.
    #[inline]
    #[must_use]
    pub const fn coin_type(self) -> u32 {
        match self {
            Self::Ethereum => 60,
            Self::Solana => 501,
        }
    }

    /// Native asset denomination (ETH: 18 decimals, SOL: 9 decimals).
    #[must_use]
    pub const fn denomination(self) -> Denomination {
        match self {
            Self::Ethereum => Denomination::new(18, "ETH", RoundingMode::Exact),
            Self::Solana => Denomination::new(9, "SOL", RoundingMode::Exact),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "solana" | "sol" => Ok(Self::Solana),
            _ => Err(Error::Config(format!("unknown chain '{s}'"))),
        }
    }
}
