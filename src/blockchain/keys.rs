// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Private key parsing and key/address correspondence checks.
//!
//! Keys are only used to derive their address. Nothing here signs.

use std::str::FromStr;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use k256::{ecdsa::SigningKey, SecretKey};

use crate::error::AuditError;

/// Parse a hex-encoded secp256k1 private key (64 hex chars, optional `0x`).
///
/// The scalar must be non-zero and below the curve order.
pub fn parse_private_key(private_key_hex: &str) -> Result<PrivateKeySigner, AuditError> {
    let trimmed = private_key_hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 64 {
        return Err(AuditError::InvalidPrivateKey(format!(
            "expected 64 hex characters, got {}",
            digits.len()
        )));
    }

    let key_bytes = alloy::hex::decode(digits)
        .map_err(|e| AuditError::InvalidPrivateKey(e.to_string()))?;

    let secret_key = SecretKey::from_slice(&key_bytes)
        .map_err(|_| AuditError::InvalidPrivateKey("scalar out of range".to_string()))?;

    Ok(PrivateKeySigner::from_signing_key(SigningKey::from(secret_key)))
}

/// Address controlled by a private key.
pub fn derive_address(private_key_hex: &str) -> Result<Address, AuditError> {
    Ok(parse_private_key(private_key_hex)?.address())
}

/// Check that `private_key_hex` controls `address`.
///
/// Addresses compare as 20-byte values, so letter case (and EIP-55
/// checksum casing) is irrelevant. Returns the parsed address.
pub fn verify_pair(address: &str, private_key_hex: &str) -> Result<Address, AuditError> {
    let expected = Address::from_str(address.trim())
        .map_err(|e| AuditError::InvalidAddress(format!("{address}: {e}")))?;
    let derived = derive_address(private_key_hex)?;

    if derived != expected {
        return Err(AuditError::KeyMismatch {
            address: address.to_string(),
            derived: derived.to_checksum(None),
        });
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development accounts (anvil / hardhat mnemonic)
    const KEY_0: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ADDR_0: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const ADDR_1: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    #[test]
    fn test_derive_address() {
        let derived = derive_address(KEY_0).unwrap();
        assert_eq!(derived.to_checksum(None), ADDR_0);
    }

    #[test]
    fn test_prefixed_key_accepted() {
        let derived = derive_address(&format!("0x{KEY_0}")).unwrap();
        assert_eq!(derived.to_checksum(None), ADDR_0);
    }

    #[test]
    fn test_verify_pair_ignores_case() {
        assert!(verify_pair(ADDR_0, KEY_0).is_ok());
        assert!(verify_pair(&ADDR_0.to_lowercase(), KEY_0).is_ok());
        assert!(verify_pair(&ADDR_0.to_uppercase().replacen("0X", "0x", 1), KEY_0).is_ok());
    }

    #[test]
    fn test_verify_pair_mismatch_reports_derived() {
        match verify_pair(ADDR_1, KEY_0) {
            Err(AuditError::KeyMismatch { address, derived }) => {
                assert_eq!(address, ADDR_1);
                assert_eq!(derived, ADDR_0);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            parse_private_key("1234"),
            Err(AuditError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            parse_private_key(&"zz".repeat(32)),
            Err(AuditError::InvalidPrivateKey(_))
        ));
        // Zero is not a valid secret scalar
        assert!(matches!(
            parse_private_key(&"00".repeat(32)),
            Err(AuditError::InvalidPrivateKey(_))
        ));
        // Above the secp256k1 group order
        assert!(matches!(
            parse_private_key(&"ff".repeat(32)),
            Err(AuditError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_invalid_address() {
        assert!(matches!(
            verify_pair("0x1234", KEY_0),
            Err(AuditError::InvalidAddress(_))
        ));
    }
}
