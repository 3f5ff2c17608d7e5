//! Hashing utilities for ledger identifiers
//!
//! Provides the SHA-256 / RIPEMD-160 helpers used for base58 checksums
//! and account id derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
/// Used for base58 checksums
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// First 4 bytes of the double SHA-256, appended to every base58 payload
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let hash = double_sha256(data);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// RIPEMD160(SHA256(data)), the 20-byte account id of a public key
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha256(data));
    let digest = ripemd.finalize();

    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let hash = sha256(b"hello world");
        assert_eq!(hash.len(), 32);
        assert_eq!(
            hex::encode(hash),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_checksum_is_prefix_of_double_sha256() {
        let data = b"hello world";
        assert_eq!(checksum(data).to_vec(), double_sha256(data)[..4].to_vec());
    }

    #[test]
    fn test_hash160_length() {
        assert_eq!(hash160(b"key").len(), 20);
    }
}
