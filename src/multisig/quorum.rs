//! Quorum clamping
//!
//! A quorum larger than the configured weight could never be met, so it is
//! lowered to the total weight. Nothing here raises or rejects a quorum.

use crate::multisig::signer::SignerEntry;

/// Sum of all signer weights
pub fn total_weight(signers: &[SignerEntry]) -> u32 {
    signers.iter().map(|s| u32::from(s.weight)).sum()
}

/// Clamp `requested` to the total weight of `signers`
pub fn validate_quorum(signers: &[SignerEntry], requested: u32) -> u32 {
    let total = total_weight(signers);
    if requested > total {
        log::debug!("Quorum {} exceeds total weight {}, clamping", requested, total);
        total
    } else {
        requested
    }
}
