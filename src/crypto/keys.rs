//! Signing public key checks
//!
//! The ledger accepts two kinds of signing keys: 33-byte compressed
//! secp256k1 points and 32-byte ed25519 keys written with an `ED` prefix.
//! Keys coming back from the signing oracle are checked here before they
//! are placed into a `Signers` entry.

use secp256k1::PublicKey;
use thiserror::Error;

use super::seed::KeyAlgorithm;

/// Hex prefix marking an ed25519 signing key
pub const ED25519_KEY_PREFIX: &str = "ED";

/// Errors that can occur during key checks
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid public key hex")]
    InvalidHex,
    #[error("Invalid public key length: {0} bytes")]
    InvalidLength(usize),
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// Check a hex-encoded signing public key and report its algorithm
pub fn signing_key_algorithm(public_key_hex: &str) -> Result<KeyAlgorithm, KeyError> {
    let bytes = hex::decode(public_key_hex).map_err(|_| KeyError::InvalidHex)?;

    if public_key_hex.len() >= 2 && public_key_hex[..2].eq_ignore_ascii_case(ED25519_KEY_PREFIX) {
        if bytes.len() != 33 {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        return Ok(KeyAlgorithm::Ed25519);
    }

    if bytes.len() != 33 {
        return Err(KeyError::InvalidLength(bytes.len()));
    }
    PublicKey::from_slice(&bytes)?;
    Ok(KeyAlgorithm::Secp256k1)
}
