//! Validators
//!
//! Each validator inspects one concern and returns `None` when it passes or
//! the message to show when it fails. Blank fields are left to the required
//! check so a missing value is reported once.

use crate::core::{AccountFlag, Drops};
use crate::crypto::{is_placeholder_seed, is_valid_classic_address, is_valid_seed};
use crate::multisig::{filled_entries, split_list, MultiSignError, MAX_SIGNER_ENTRIES};
use crate::validation::inputs::{Field, ValidationInputs};
use std::collections::BTreeSet;

/// A single conditional check
pub type Validator = fn(&ValidationInputs) -> Option<String>;

/// A ticket is consumed by the first transaction that uses it
pub const SINGLE_TICKET_MESSAGE: &str = "A ticket can only be used for one transaction";

/// Message of a failed required check
pub fn required_message(field: Field) -> String {
    format!("{} cannot be empty", field)
}

/// Inclusive numeric range check on a field; blank passes
pub fn check_range(
    inputs: &ValidationInputs,
    field: Field,
    min: Option<f64>,
    max: Option<f64>,
) -> Option<String> {
    let raw = field.value(inputs);
    if raw.is_empty() {
        return None;
    }

    let value = match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Some(format!("{} must be a valid number", field)),
    };

    if let Some(min) = min {
        if value < min {
            return Some(format!("{} must be at least {}", field, min));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Some(format!("{} cannot be greater than {}", field, max));
        }
    }
    None
}

fn check_address(inputs: &ValidationInputs, field: Field) -> Option<String> {
    let raw = field.value(inputs);
    if raw.is_empty() || is_valid_classic_address(raw) {
        None
    } else {
        Some(format!("{} address is invalid", field))
    }
}

fn is_own_address(inputs: &ValidationInputs, field: Field) -> bool {
    let own = Field::Account.value(inputs);
    !own.is_empty() && field.value(inputs) == own
}

// Digits with at most one decimal point, no sign or exponent
fn is_plain_decimal(raw: &str) -> bool {
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    !(whole.is_empty() && frac.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && frac.chars().all(|c| c.is_ascii_digit())
}

fn check_xrp_amount(inputs: &ValidationInputs, field: Field) -> Option<String> {
    check_range(inputs, field, Some(0.000001), None).or_else(|| {
        let raw = field.value(inputs);
        if raw.is_empty() || Drops::from_xrp(raw).is_some() {
            None
        } else if !is_plain_decimal(raw) {
            Some(format!("{} must be a valid XRP amount", field))
        } else {
            Some(format!("{} must have at most 6 decimal places", field))
        }
    })
}

// =============================================================================
// Account and signing path
// =============================================================================

pub fn account_address(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::Account)
}

pub fn account_seed(inputs: &ValidationInputs) -> Option<String> {
    let seed = Field::Seed.value(inputs);
    if seed.is_empty() || is_valid_seed(seed) {
        None
    } else {
        Some("Account seed is invalid".to_string())
    }
}

pub fn master_key_policy(inputs: &ValidationInputs) -> Option<String> {
    if inputs.master_key_disabled && !inputs.use_multi_sign && !inputs.is_regular_key {
        Some("Master key is disabled. Must sign with Regular Key or Multi-sign.".to_string())
    } else {
        None
    }
}

pub fn regular_key_seed(inputs: &ValidationInputs) -> Option<String> {
    let seed = inputs.regular_key_seed.trim();
    if !inputs.is_regular_key || seed.is_empty() || is_valid_seed(seed) {
        None
    } else {
        Some("Regular key seed is invalid".to_string())
    }
}

pub fn ticket_sequence(inputs: &ValidationInputs) -> Option<String> {
    if !inputs.is_ticket {
        return None;
    }
    if !Field::TicketSequence.is_present(inputs) {
        return Some(required_message(Field::TicketSequence));
    }
    check_range(inputs, Field::TicketSequence, Some(1.0), None)
}

// =============================================================================
// Multi-sign pairing
// =============================================================================

/// Address and seed lists are non-empty and of equal length
pub fn multi_sign_pairing(inputs: &ValidationInputs) -> Option<String> {
    if !inputs.use_multi_sign {
        return None;
    }
    let addresses = split_list(&inputs.multi_sign_addresses);
    let seeds = split_list(&inputs.multi_sign_seeds);

    if addresses.is_empty() || seeds.is_empty() {
        return Some(MultiSignError::EmptyRequest.to_string());
    }
    if addresses.len() != seeds.len() {
        return Some(
            MultiSignError::CountMismatch {
                addresses: addresses.len(),
                seeds: seeds.len(),
            }
            .to_string(),
        );
    }
    if addresses.len() > MAX_SIGNER_ENTRIES {
        return Some(MultiSignError::TooManySigners(addresses.len()).to_string());
    }
    None
}

pub fn multi_sign_addresses(inputs: &ValidationInputs) -> Option<String> {
    if !inputs.use_multi_sign {
        return None;
    }
    let invalid: Vec<String> = split_list(&inputs.multi_sign_addresses)
        .into_iter()
        .filter(|a| !is_valid_classic_address(a))
        .collect();

    if invalid.is_empty() {
        None
    } else {
        Some(format!("Invalid signer address: {}", invalid.join(", ")))
    }
}

pub fn multi_sign_seeds(inputs: &ValidationInputs) -> Option<String> {
    if !inputs.use_multi_sign {
        return None;
    }
    let invalid = split_list(&inputs.multi_sign_seeds)
        .iter()
        .filter(|s| !is_valid_seed(s))
        .count();

    if invalid == 0 {
        None
    } else {
        Some(format!("{} signer seed(s) are invalid", invalid))
    }
}

// =============================================================================
// Signer list
// =============================================================================

pub fn signer_list_not_empty(inputs: &ValidationInputs) -> Option<String> {
    if filled_entries(&inputs.signer_entries).is_empty() {
        Some("No valid signer accounts provided".to_string())
    } else {
        None
    }
}

pub fn signer_list_excludes_account(inputs: &ValidationInputs) -> Option<String> {
    let own = Field::Account.value(inputs);
    if own.is_empty() {
        return None;
    }
    if filled_entries(&inputs.signer_entries)
        .iter()
        .any(|e| e.account.trim() == own)
    {
        Some("Signer list cannot include the account's own address".to_string())
    } else {
        None
    }
}

pub fn signer_list_addresses(inputs: &ValidationInputs) -> Option<String> {
    let invalid: Vec<&str> = filled_entries(&inputs.signer_entries)
        .into_iter()
        .map(|e| e.account.trim())
        .filter(|a| !is_valid_classic_address(a))
        .collect();

    if invalid.is_empty() {
        None
    } else {
        Some(format!("Invalid signer address: {}", invalid.join(", ")))
    }
}

/// Every filled signer carries a real seed in a supported format
pub fn signer_list_seeds(inputs: &ValidationInputs) -> Option<String> {
    let entries = filled_entries(&inputs.signer_entries);

    let missing: Vec<&str> = entries
        .iter()
        .filter(|e| is_placeholder_seed(&e.seed))
        .map(|e| e.account.trim())
        .collect();
    if !missing.is_empty() {
        return Some(format!("Signer seed is missing for: {}", missing.join(", ")));
    }

    let invalid: Vec<&str> = entries
        .iter()
        .filter(|e| !is_valid_seed(&e.seed))
        .map(|e| e.account.trim())
        .collect();
    if !invalid.is_empty() {
        return Some(format!("Signer seed is invalid for: {}", invalid.join(", ")));
    }
    None
}

pub fn signer_list_weights(inputs: &ValidationInputs) -> Option<String> {
    let light: Vec<&str> = filled_entries(&inputs.signer_entries)
        .into_iter()
        .filter(|e| e.weight < 1)
        .map(|e| e.account.trim())
        .collect();

    if light.is_empty() {
        None
    } else {
        Some(format!("Signer weight must be at least 1 for: {}", light.join(", ")))
    }
}

pub fn signer_list_unique(inputs: &ValidationInputs) -> Option<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for entry in filled_entries(&inputs.signer_entries) {
        let account = entry.account.trim();
        if !seen.insert(account) {
            duplicates.insert(account);
        }
    }

    if duplicates.is_empty() {
        None
    } else {
        let names: Vec<&str> = duplicates.into_iter().collect();
        Some(format!("Duplicate signer addresses: {}", names.join(", ")))
    }
}

pub fn signer_list_size(inputs: &ValidationInputs) -> Option<String> {
    let count = filled_entries(&inputs.signer_entries).len();
    if count > MAX_SIGNER_ENTRIES {
        Some(MultiSignError::TooManySigners(count).to_string())
    } else {
        None
    }
}

pub fn quorum_positive(inputs: &ValidationInputs) -> Option<String> {
    let raw = Field::Quorum.value(inputs);
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(q) if !q.is_finite() => Some(format!("{} must be a valid number", Field::Quorum)),
        Ok(q) if q <= 0.0 => Some("Quorum must be greater than 0".to_string()),
        Ok(_) => None,
        Err(_) => Some(format!("{} must be a valid number", Field::Quorum)),
    }
}

pub fn quorum_reachable(inputs: &ValidationInputs) -> Option<String> {
    let quorum = match Field::Quorum.value(inputs).parse::<f64>() {
        Ok(q) if q.is_finite() && q > 0.0 => q,
        _ => return None,
    };
    let total: u32 = filled_entries(&inputs.signer_entries)
        .iter()
        .map(|e| u32::from(e.weight))
        .sum();

    if quorum > f64::from(total) {
        Some(format!(
            "Quorum ({}) cannot exceed total signer weight ({})",
            quorum, total
        ))
    } else {
        None
    }
}

// =============================================================================
// Flags
// =============================================================================

pub fn flags_selected(inputs: &ValidationInputs) -> Option<String> {
    if inputs.flags.is_empty() {
        Some("Select at least one flag to set or clear".to_string())
    } else {
        None
    }
}

pub fn flags_consistent(inputs: &ValidationInputs) -> Option<String> {
    let both = inputs.flags.contradictions();
    if both.is_empty() {
        return None;
    }
    let names: Vec<String> = both.iter().map(ToString::to_string).collect();
    Some(format!("Cannot both set and clear: {}", names.join(", ")))
}

pub fn freeze_conflict(inputs: &ValidationInputs) -> Option<String> {
    if inputs.flags.sets(AccountFlag::NoFreeze) && inputs.flags.sets(AccountFlag::GlobalFreeze) {
        Some("Cannot enable both NoFreeze and GlobalFreeze".to_string())
    } else {
        None
    }
}

/// Each flag change is its own transaction, so a ticket allows only one
pub fn flags_single_ticket(inputs: &ValidationInputs) -> Option<String> {
    let changes = inputs.flags.set.len() + inputs.flags.clear.len();
    if inputs.is_ticket && changes > 1 {
        Some(format!("{}; change one flag at a time", SINGLE_TICKET_MESSAGE))
    } else {
        None
    }
}

/// Disabling the master key needs another way to sign afterwards
pub fn master_lockout(inputs: &ValidationInputs) -> Option<String> {
    if inputs.flags.sets(AccountFlag::DisableMaster)
        && !inputs.regular_key_configured
        && !inputs.signer_list_configured
    {
        Some(
            "Cannot disable the master key without a regular key or signer list configured"
                .to_string(),
        )
    } else {
        None
    }
}

// =============================================================================
// Type-specific fields
// =============================================================================

pub fn ticket_count(inputs: &ValidationInputs) -> Option<String> {
    check_range(inputs, Field::TicketCount, Some(1.0), Some(250.0))
}

pub fn regular_key_address(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::RegularKey).or_else(|| {
        is_own_address(inputs, Field::RegularKey)
            .then(|| "Regular key cannot be the account's own address".to_string())
    })
}

pub fn authorized_address(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::Authorize).or_else(|| {
        is_own_address(inputs, Field::Authorize)
            .then(|| "An account cannot preauthorize itself".to_string())
    })
}

pub fn destination(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::Destination).or_else(|| {
        is_own_address(inputs, Field::Destination)
            .then(|| "Destination cannot be the account itself".to_string())
    })
}

pub fn amount(inputs: &ValidationInputs) -> Option<String> {
    check_xrp_amount(inputs, Field::Amount)
}

pub fn check_id(inputs: &ValidationInputs) -> Option<String> {
    let raw = Field::CheckId.value(inputs);
    if raw.is_empty() || (raw.len() == 64 && raw.chars().all(|c| c.is_ascii_hexdigit())) {
        None
    } else {
        Some(format!("{} must be 64 hex characters", Field::CheckId))
    }
}

pub fn subject(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::Subject)
}

pub fn issuer(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::Issuer)
}

/// Deleting a credential names at least one party besides the sender
pub fn credential_party(inputs: &ValidationInputs) -> Option<String> {
    if Field::Subject.is_present(inputs) || Field::Issuer.is_present(inputs) {
        None
    } else {
        Some("Subject or Issuer must be provided".to_string())
    }
}

pub fn credential_type(inputs: &ValidationInputs) -> Option<String> {
    if Field::CredentialType.value(inputs).len() > 64 {
        Some(format!("{} cannot be longer than 64 bytes", Field::CredentialType))
    } else {
        None
    }
}

pub fn asset_currency(inputs: &ValidationInputs) -> Option<String> {
    let raw = Field::Asset2Currency.value(inputs);
    let standard = raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphanumeric());
    let hex = raw.len() == 40 && raw.chars().all(|c| c.is_ascii_hexdigit());

    if raw.is_empty() || ((standard || hex) && !raw.eq_ignore_ascii_case("XRP")) {
        None
    } else {
        Some(format!("{} is invalid", Field::Asset2Currency))
    }
}

pub fn asset_issuer(inputs: &ValidationInputs) -> Option<String> {
    check_address(inputs, Field::Asset2Issuer)
}

pub fn asset_amount(inputs: &ValidationInputs) -> Option<String> {
    check_range(inputs, Field::Amount2, Some(0.0), None).or_else(|| {
        match Field::Amount2.value(inputs).parse::<f64>() {
            Ok(v) if v == 0.0 => Some(format!("{} must be greater than 0", Field::Amount2)),
            _ => None,
        }
    })
}

pub fn trading_fee(inputs: &ValidationInputs) -> Option<String> {
    check_range(inputs, Field::TradingFee, Some(0.0), Some(1000.0))
}
