//! Cryptographic formats used by the ledger
//!
//! This module provides:
//! - SHA-256 / RIPEMD-160 hashing
//! - Classic address encoding and checksum validation
//! - Seed format detection (family seeds, mnemonics, secret numbers)
//! - Signing public key checks

pub mod address;
pub mod hash;
pub mod keys;
pub mod seed;

pub use address::{
    address_from_public_key, decode_classic_address, encode_classic_address,
    is_valid_classic_address, AddressError,
};
pub use hash::{checksum, double_sha256, hash160, sha256};
pub use keys::{signing_key_algorithm, KeyError};
pub use seed::{
    detect_seed_format, is_placeholder_seed, is_valid_seed, KeyAlgorithm, SeedError, SeedFormat,
};
