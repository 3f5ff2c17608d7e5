//! Seed format detection
//!
//! A signing credential can be derived from three encodings of the same
//! 16 bytes of entropy:
//! - family seeds (`s...` for secp256k1, `sEd...` for ed25519)
//! - BIP-39 English mnemonics
//! - secret numbers (8 groups of 6 digits with a check digit per group)
//!
//! Only the format is validated here. Deriving keys is the signing oracle's job.

use bip39::{Language, Mnemonic};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::checksum;

/// Version byte of a secp256k1 family seed
pub const FAMILY_SEED_VERSION: u8 = 0x21;

/// Version prefix of an ed25519 family seed
pub const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];

/// Entropy length of every seed encoding
pub const SEED_ENTROPY_LEN: usize = 16;

/// Number of digit groups in a secret-numbers seed
pub const SECRET_NUMBER_GROUPS: usize = 8;

/// Errors produced while classifying a seed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeedError {
    #[error("Seed is empty")]
    Empty,
    #[error("Invalid family seed: {0}")]
    InvalidFamilySeed(String),
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("Invalid secret numbers: {0}")]
    InvalidSecretNumbers(String),
    #[error("Unrecognized seed format")]
    Unrecognized,
}

/// Key algorithm encoded in a family seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    Secp256k1,
    Ed25519,
}

/// Detected encoding of a seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum SeedFormat {
    FamilySeed { algorithm: KeyAlgorithm },
    Mnemonic { words: usize },
    SecretNumbers,
}

impl std::fmt::Display for SeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedFormat::FamilySeed { algorithm } => write!(f, "family seed ({:?})", algorithm),
            SeedFormat::Mnemonic { words } => write!(f, "mnemonic ({} words)", words),
            SeedFormat::SecretNumbers => write!(f, "secret numbers"),
        }
    }
}

/// Classify a seed, returning the precise reason when it is malformed
pub fn detect_seed_format(seed: &str) -> Result<SeedFormat, SeedError> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(SeedError::Empty);
    }

    if seed.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        check_secret_numbers(seed)?;
        return Ok(SeedFormat::SecretNumbers);
    }

    if seed.split_whitespace().count() > 1 {
        let words = check_mnemonic(seed)?;
        return Ok(SeedFormat::Mnemonic { words });
    }

    if seed.starts_with('s') {
        let algorithm = check_family_seed(seed)?;
        return Ok(SeedFormat::FamilySeed { algorithm });
    }

    Err(SeedError::Unrecognized)
}

/// True when the seed is in any supported, well-formed encoding
pub fn is_valid_seed(seed: &str) -> bool {
    detect_seed_format(seed).is_ok()
}

/// Blank seeds and masked seeds (`****`, `••••`) are form placeholders, not secrets
pub fn is_placeholder_seed(seed: &str) -> bool {
    let seed = seed.trim();
    seed.is_empty() || seed.chars().all(|c| c == '*' || c == '•')
}

fn check_family_seed(seed: &str) -> Result<KeyAlgorithm, SeedError> {
    let bytes = bs58::decode(seed)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| SeedError::InvalidFamilySeed(e.to_string()))?;

    let (algorithm, prefix_len) = if bytes.len() == 3 + SEED_ENTROPY_LEN + 4
        && bytes[..3] == ED25519_SEED_PREFIX
    {
        (KeyAlgorithm::Ed25519, 3)
    } else if bytes.len() == 1 + SEED_ENTROPY_LEN + 4 && bytes[0] == FAMILY_SEED_VERSION {
        (KeyAlgorithm::Secp256k1, 1)
    } else {
        return Err(SeedError::InvalidFamilySeed(format!(
            "unexpected payload of {} bytes",
            bytes.len()
        )));
    };

    let (payload, check) = bytes.split_at(prefix_len + SEED_ENTROPY_LEN);
    if checksum(payload) != check {
        return Err(SeedError::InvalidFamilySeed("checksum mismatch".to_string()));
    }

    Ok(algorithm)
}

fn check_mnemonic(phrase: &str) -> Result<usize, SeedError> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))?;
    Ok(mnemonic.word_count())
}

fn check_secret_numbers(input: &str) -> Result<(), SeedError> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != SECRET_NUMBER_GROUPS * 6 {
        return Err(SeedError::InvalidSecretNumbers(format!(
            "expected {} digits, got {}",
            SECRET_NUMBER_GROUPS * 6,
            digits.len()
        )));
    }

    for (position, group) in digits.as_bytes().chunks(6).enumerate() {
        let value: u32 = group[..5]
            .iter()
            .fold(0, |acc, d| acc * 10 + u32::from(d - b'0'));
        let check = u32::from(group[5] - b'0');

        if value > u32::from(u16::MAX) {
            return Err(SeedError::InvalidSecretNumbers(format!(
                "group {} is out of range",
                position + 1
            )));
        }
        if value * (position as u32 * 2 + 1) % 9 != check {
            return Err(SeedError::InvalidSecretNumbers(format!(
                "group {} has a bad check digit",
                position + 1
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS_SEED: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
    const ED25519_SEED: &str = "sEdTM1uX8pu2do5XvTnutH6HsouMaM2";
    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const SECRET_NUMBERS: &str = "002586 007723 012864 018000 023140 028284 033423 038566";

    #[test]
    fn test_family_seeds() {
        assert_eq!(
            detect_seed_format(GENESIS_SEED),
            Ok(SeedFormat::FamilySeed {
                algorithm: KeyAlgorithm::Secp256k1
            })
        );
        assert_eq!(
            detect_seed_format(ED25519_SEED),
            Ok(SeedFormat::FamilySeed {
                algorithm: KeyAlgorithm::Ed25519
            })
        );
    }

    #[test]
    fn test_family_seed_checksum() {
        assert!(matches!(
            detect_seed_format("snoPBrXtMeMyMHUVTgbuqAfg1SUTc"),
            Err(SeedError::InvalidFamilySeed(_))
        ));
        assert!(!is_valid_seed("seed1"));
    }

    #[test]
    fn test_mnemonic() {
        assert_eq!(
            detect_seed_format(MNEMONIC),
            Ok(SeedFormat::Mnemonic { words: 12 })
        );
        assert!(matches!(
            detect_seed_format("abandon abandon zebra"),
            Err(SeedError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_secret_numbers() {
        assert_eq!(
            detect_seed_format(SECRET_NUMBERS),
            Ok(SeedFormat::SecretNumbers)
        );
        // same digits without separators
        assert!(is_valid_seed(&SECRET_NUMBERS.replace(' ', "")));
        // first group's check digit altered
        assert!(matches!(
            detect_seed_format("002587 007723 012864 018000 023140 028284 033423 038566"),
            Err(SeedError::InvalidSecretNumbers(_))
        ));
        assert!(!is_valid_seed("123456"));
    }

    #[test]
    fn test_unrecognized_and_empty() {
        assert_eq!(detect_seed_format("   "), Err(SeedError::Empty));
        assert_eq!(detect_seed_format("xyz"), Err(SeedError::Unrecognized));
    }

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder_seed(""));
        assert!(is_placeholder_seed("  "));
        assert!(is_placeholder_seed("******"));
        assert!(is_placeholder_seed("••••"));
        assert!(!is_placeholder_seed(GENESIS_SEED));
    }
}
