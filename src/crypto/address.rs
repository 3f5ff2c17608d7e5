//! Classic address codec
//!
//! A classic address is `Base58Check(0x00 || account_id)` written with the
//! ledger's own base58 alphabet, so every address starts with `r`.

use thiserror::Error;

use super::hash::{checksum, hash160};

/// Version byte of an account id payload
pub const ACCOUNT_ID_VERSION: u8 = 0x00;

/// Length of an account id in bytes
pub const ACCOUNT_ID_LEN: usize = 20;

/// Errors that can occur while decoding an address
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,
    #[error("Address must start with 'r'")]
    BadPrefix,
    #[error("Address is not valid base58: {0}")]
    Base58(String),
    #[error("Address payload has wrong length: {0}")]
    BadLength(usize),
    #[error("Address has wrong version byte: {0:#04x}")]
    BadVersion(u8),
    #[error("Address checksum mismatch")]
    BadChecksum,
    #[error("Invalid public key hex")]
    InvalidPublicKey,
}

/// Decode a classic address into its 20-byte account id
pub fn decode_classic_address(address: &str) -> Result<[u8; ACCOUNT_ID_LEN], AddressError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AddressError::Empty);
    }
    if !address.starts_with('r') {
        return Err(AddressError::BadPrefix);
    }

    let bytes = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| AddressError::Base58(e.to_string()))?;

    if bytes.len() != 1 + ACCOUNT_ID_LEN + 4 {
        return Err(AddressError::BadLength(bytes.len()));
    }
    if bytes[0] != ACCOUNT_ID_VERSION {
        return Err(AddressError::BadVersion(bytes[0]));
    }

    let (payload, check) = bytes.split_at(1 + ACCOUNT_ID_LEN);
    if checksum(payload) != check {
        return Err(AddressError::BadChecksum);
    }

    let mut account_id = [0u8; ACCOUNT_ID_LEN];
    account_id.copy_from_slice(&payload[1..]);
    Ok(account_id)
}

/// Checksum validation of a classic address
pub fn is_valid_classic_address(address: &str) -> bool {
    decode_classic_address(address).is_ok()
}

/// Encode a 20-byte account id as a classic address
pub fn encode_classic_address(account_id: &[u8; ACCOUNT_ID_LEN]) -> String {
    let mut bytes = Vec::with_capacity(1 + ACCOUNT_ID_LEN + 4);
    bytes.push(ACCOUNT_ID_VERSION);
    bytes.extend_from_slice(account_id);
    let check = checksum(&bytes);
    bytes.extend_from_slice(&check);

    bs58::encode(bytes)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Derive the classic address controlled by a hex-encoded signing public key
pub fn address_from_public_key(public_key_hex: &str) -> Result<String, AddressError> {
    let bytes = hex::decode(public_key_hex).map_err(|_| AddressError::InvalidPublicKey)?;
    if bytes.is_empty() {
        return Err(AddressError::InvalidPublicKey);
    }
    Ok(encode_classic_address(&hash160(&bytes)))
}
