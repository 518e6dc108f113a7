//! Ethereum address helpers.
//!
//! Uses `alloy_primitives::Address` for keccak hashing and EIP-55 checksums.

use alloy_primitives::Address;

/// Derive the checksummed address of an uncompressed SEC1 public key.
///
/// `public_key` is the 65-byte `0x04 || x || y` encoding.
#[must_use]
pub fn public_key_to_address(public_key: &[u8]) -> String {
    let raw = public_key.strip_prefix(&[0x04]).unwrap_or(public_key);
    Address::from_raw_public_key(raw).to_checksum(None)
}

/// Parse a `0x`-prefixed, 40 hex character address.
///
/// All-lowercase and all-uppercase bodies are accepted as unchecksummed.
/// Mixed case must match the EIP-55 checksum exactly.
#[must_use]
pub fn parse_address(text: &str) -> Option<Address> {
    let body = text.strip_prefix("0x")?;
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(body, &mut bytes).ok()?;
    let address = Address::new(bytes);

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *body {
        return None;
    }
    Some(address)
}

/// Whether `text` is a well-formed Ethereum address.
#[inline]
#[must_use]
pub fn is_valid_address(text: &str) -> bool {
    parse_address(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_checksummed_is_valid() {
        assert!(is_valid_address(CHECKSUMMED));
        assert!(is_valid_address("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"));
    }

    #[test]
    fn test_single_case_is_valid() {
        assert!(is_valid_address(&CHECKSUMMED.to_lowercase()));
        assert!(is_valid_address(&format!("0x{}", CHECKSUMMED[2..].to_uppercase())));
    }

    #[test]
    fn test_bad_checksum_is_invalid() {
        // Flip the case of one letter
        let tampered = CHECKSUMMED.replacen("aA", "Aa", 1);
        assert!(!is_valid_address(&tampered));
    }

    #[test]
    fn test_structural_failures() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x"));
        assert!(!is_valid_address(&CHECKSUMMED[2..]));
        assert!(!is_valid_address(&CHECKSUMMED[..41]));
        assert!(!is_valid_address("0xZZaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_valid_address(&format!("{CHECKSUMMED}00")));
    }

    #[test]
    fn test_public_key_to_address() {
        // secp256k1 generator point, i.e. the public key of secret key 1
        let public_key = hex_literal::hex!(
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        assert_eq!(
            public_key_to_address(&public_key),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }
}
