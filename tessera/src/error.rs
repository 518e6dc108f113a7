//! Error types for core wallet operations.

use thiserror::Error;

use crate::chain::Chain;
use crate::send::SendState;

/// A convenient Result type alias for tessera operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur during derivation, building, signing and sending.
///
/// Derivation and signing errors are input errors and are never retried.
/// Broadcast-time errors are handed back so the caller can decide whether
/// to rebuild with fresher network parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The mnemonic failed wordlist, word-count or checksum validation.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] MnemonicError),

    /// The address was never added to the chain's registry.
    #[error("unknown {chain} wallet: {address}")]
    UnknownWallet {
        /// Chain the lookup was made on.
        chain: Chain,
        /// The address that was not found.
        address: String,
    },

    /// The address is not well-formed for the chain.
    #[error("invalid {chain} address: {address}")]
    InvalidAddress {
        /// Chain the address was checked against.
        chain: Chain,
        /// The rejected text.
        address: String,
    },

    /// The amount is zero, negative, malformed or not representable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The network rejected the transaction because its freshness token expired.
    #[error("stale network parameters for {chain}: {reason}")]
    StaleNetworkParams {
        /// Chain that rejected the transaction.
        chain: Chain,
        /// Rejection reason as reported by the network.
        reason: String,
    },

    /// The supplied key does not belong to the transaction's sender.
    #[error("signing key {key_address} does not match sender {sender}")]
    SigningKeyMismatch {
        /// Declared sender of the transaction.
        sender: String,
        /// Address derived from the supplied key.
        key_address: String,
    },

    /// The broadcast collaborator rejected the transaction.
    #[error("broadcast rejected: {0}")]
    BroadcastRejected(String),

    /// Network parameters do not fit the chain (wrong variant or malformed token).
    #[error("invalid network parameters: {0}")]
    InvalidNetworkParams(String),

    /// Key derivation failed.
    #[error("key derivation error: {0}")]
    Derivation(String),

    /// A send attempt was asked to move to a state it cannot reach.
    #[error("invalid send transition from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: SendState,
        /// Requested state.
        to: SendState,
    },

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted wallet data disagrees with re-derivation from the mnemonic.
    #[error("persisted {chain} wallet #{index} does not match derivation")]
    StorageCorrupted {
        /// Chain whose data is inconsistent.
        chain: Chain,
        /// Account index that failed to re-derive.
        index: u32,
    },

    /// The network collaborator failed.
    #[error("network error: {0}")]
    Network(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// No scheme is registered for the chain.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(Chain),
}

/// Detail of a mnemonic validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MnemonicError {
    /// The phrase has a word count BIP-39 does not allow.
    #[error("invalid word count {0}, must be 12, 15, 18, 21, or 24")]
    InvalidWordCount(usize),

    /// A word is not in the English BIP-39 wordlist.
    #[error("word #{position} \"{word}\" is not in the wordlist")]
    UnknownWord {
        /// One-based position of the word in the phrase.
        position: usize,
        /// The offending word.
        word: String,
    },

    /// All words are known but the checksum does not match.
    #[error("checksum does not match")]
    InvalidChecksum,

    /// Entropy length does not map to a valid mnemonic.
    #[error("invalid entropy length of {0} bits")]
    InvalidEntropy(usize),

    /// Any other BIP-39 failure.
    #[error("{0}")]
    Other(String),
}

impl MnemonicError {
    /// Translate a `bip39` error, resolving word indices against `phrase`.
    pub(crate) fn from_bip39(err: bip39::Error, phrase: &str) -> Self {
        match err {
            bip39::Error::BadWordCount(n) => Self::InvalidWordCount(n),
            bip39::Error::UnknownWord(i) => Self::UnknownWord {
                position: i + 1,
                word: phrase
                    .split_whitespace()
                    .nth(i)
                    .unwrap_or_default()
                    .to_string(),
            },
            bip39::Error::InvalidChecksum => Self::InvalidChecksum,
            bip39::Error::BadEntropyBitCount(bits) => Self::InvalidEntropy(bits),
            other => Self::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_word_names_position() {
        let phrase = "abandon zzzz abandon";
        let err = MnemonicError::from_bip39(bip39::Error::UnknownWord(1), phrase);
        assert_eq!(
            err,
            MnemonicError::UnknownWord {
                position: 2,
                word: "zzzz".into()
            }
        );
        assert!(err.to_string().contains("zzzz"));
    }

    #[test]
    fn test_mnemonic_error_wraps_into_error() {
        let err: Error = MnemonicError::InvalidChecksum.into();
        assert_eq!(err.to_string(), "invalid mnemonic: checksum does not match");
    }
}
