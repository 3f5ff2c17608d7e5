//! Fee arithmetic
//!
//! Native amounts are counted in drops. A multi-signed transaction pays
//! the base fee once for the transaction and once per signer:
//! `fee = (signers + 1) * base_fee`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Constants
// =============================================================================

/// Drops in one XRP
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Maximum decimal places of an XRP amount
pub const XRP_DECIMALS: usize = 6;

// =============================================================================
// Drops
// =============================================================================

/// An amount of the native currency in drops
///
/// Serialized as a decimal string, the way the ledger writes `Fee` and
/// native `Amount` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Drops(pub u64);

impl Drops {
    pub fn new(drops: u64) -> Self {
        Self(drops)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Drops) -> Option<Drops> {
        self.0.checked_add(other.0).map(Drops)
    }

    /// Parse a decimal XRP amount ("1.5") into drops
    pub fn from_xrp(xrp: &str) -> Option<Self> {
        let xrp = xrp.trim();
        let (whole, frac) = match xrp.split_once('.') {
            Some((w, f)) => (w, f),
            None => (xrp, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > XRP_DECIMALS
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let frac: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<width$}", frac, width = XRP_DECIMALS).parse().ok()?
        };

        whole
            .checked_mul(DROPS_PER_XRP)
            .and_then(|d| d.checked_add(frac))
            .map(Drops)
    }
}

impl fmt::Display for Drops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Drops {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Drops {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Drops(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Drops)
                .map_err(|_| serde::de::Error::custom(format!("invalid drops amount: {}", s))),
        }
    }
}

// =============================================================================
// Fee Rules
// =============================================================================

/// Fee of a transaction carrying `signer_count` signatures
///
/// Saturates instead of overflowing; a saturated fee can never be paid
/// and is rejected by the balance check.
pub fn multisign_fee(base_fee: Drops, signer_count: usize) -> Drops {
    let multiplier = (signer_count as u64).saturating_add(1);
    Drops(base_fee.0.saturating_mul(multiplier))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multisign_fee_law() {
        assert_eq!(multisign_fee(Drops(10), 3), Drops(40));
        assert_eq!(multisign_fee(Drops(12), 1), Drops(24));
        assert_eq!(multisign_fee(Drops(10), 0), Drops(10));

        for k in 1..=8 {
            assert_eq!(multisign_fee(Drops(15), k).0, (k as u64 + 1) * 15);
        }
    }

    #[test]
    fn test_multisign_fee_saturates() {
        assert_eq!(multisign_fee(Drops(u64::MAX), 2), Drops(u64::MAX));
    }

    #[test]
    fn test_from_xrp() {
        assert_eq!(Drops::from_xrp("1"), Some(Drops(1_000_000)));
        assert_eq!(Drops::from_xrp("1.5"), Some(Drops(1_500_000)));
        assert_eq!(Drops::from_xrp("0.000001"), Some(Drops(1)));
        assert_eq!(Drops::from_xrp(".25"), Some(Drops(250_000)));
        assert_eq!(Drops::from_xrp("0.0000001"), None);
        assert_eq!(Drops::from_xrp("-1"), None);
        assert_eq!(Drops::from_xrp("abc"), None);
        assert_eq!(Drops::from_xrp(""), None);
    }

    #[test]
    fn test_serialized_as_string() {
        let json = serde_json::to_string(&Drops(12)).unwrap();
        assert_eq!(json, "\"12\"");

        let parsed: Drops = serde_json::from_str("\"40\"").unwrap();
        assert_eq!(parsed, Drops(40));
        let parsed: Drops = serde_json::from_str("40").unwrap();
        assert_eq!(parsed, Drops(40));
    }
}
