//! Base58 account addresses.

/// Decode a base58 address into its 32 public key bytes.
#[must_use]
pub fn parse_address(text: &str) -> Option<[u8; 32]> {
    let mut bytes = [0u8; 32];
    match bs58::decode(text).onto(&mut bytes) {
        Ok(32) => Some(bytes),
        _ => None,
    }
}

/// Whether `text` is base58 that decodes to exactly 32 bytes.
#[inline]
#[must_use]
pub fn is_valid_address(text: &str) -> bool {
    parse_address(text).is_some()
}

/// Encode 32 public key bytes as an address.
#[must_use]
pub fn encode_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}
