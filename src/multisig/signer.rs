//! Signer entries
//!
//! The editable list of `(account, seed, weight)` tuples behind a
//! multi-sign configuration, and the errors of the multisig module.

use crate::core::{TransactionDraft, TransactionType};
use crate::crypto::KeyError;
use crate::ledger::OracleError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use thiserror::Error;

/// Ledger limit on entries in a signer list
pub const MAX_SIGNER_ENTRIES: usize = 8;

/// Errors related to multisig operations
#[derive(Error, Debug)]
pub enum MultiSignError {
    #[error("XRPL allows max {} signer entries. You provided {0}", MAX_SIGNER_ENTRIES)]
    TooManySigners(usize),
    #[error("At least one signer address and seed is required")]
    EmptyRequest,
    #[error("Number of signer addresses must match number of signer seeds")]
    CountMismatch { addresses: usize, seeds: usize },
    #[error("Invalid signer address: {0}")]
    InvalidSignerAddress(String),
    #[error("Signer {address}: Wallet could not be created or is undefined")]
    WalletUnavailable { address: String },
    #[error("Signer {address}: could not derive wallet from seed: {message}")]
    Derivation { address: String, message: String },
    #[error("Signer {address}: unusable signing key: {source}")]
    InvalidPublicKey {
        address: String,
        #[source]
        source: KeyError,
    },
    #[error("Signer {address}: {message}")]
    Signing { address: String, message: String },
    #[error("No valid signature collected for multisign transaction")]
    NoSignatureCollected,
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// One configured signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEntry {
    pub account: String,
    pub seed: String,
    /// Missing weights count as 0
    #[serde(default, deserialize_with = "lenient_weight")]
    pub weight: u16,
}

impl SignerEntry {
    pub fn new(account: &str, seed: &str, weight: u16) -> Self {
        Self {
            account: account.to_string(),
            seed: seed.to_string(),
            weight,
        }
    }

    /// The entry a fresh "add signer" produces
    pub fn blank() -> Self {
        Self::new("", "", 1)
    }

    pub fn is_blank(&self) -> bool {
        self.account.trim().is_empty() && self.seed.trim().is_empty()
    }
}

impl Default for SignerEntry {
    fn default() -> Self {
        Self::blank()
    }
}

// Stored weights may be numbers or numeric strings
fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => Ok(s.trim().parse().unwrap_or(0)),
        Raw::Null(()) => Ok(0),
    }
}

/// The canonical empty configuration: one blank entry
pub fn default_entries() -> Vec<SignerEntry> {
    vec![SignerEntry::blank()]
}

/// Append a blank signer, refusing to exceed the ledger limit
pub fn add_signer(entries: &mut Vec<SignerEntry>) -> Result<(), MultiSignError> {
    if entries.len() >= MAX_SIGNER_ENTRIES {
        return Err(MultiSignError::TooManySigners(entries.len() + 1));
    }
    entries.push(SignerEntry::blank());
    Ok(())
}

/// Remove the signer at `index`; the list never becomes empty
pub fn remove_signer(entries: &mut Vec<SignerEntry>, index: usize) -> Option<SignerEntry> {
    if index >= entries.len() {
        return None;
    }
    let removed = entries.remove(index);
    if entries.is_empty() {
        entries.push(SignerEntry::blank());
    }
    Some(removed)
}

/// Entries with an account filled in
pub fn filled_entries(entries: &[SignerEntry]) -> Vec<&SignerEntry> {
    entries
        .iter()
        .filter(|e| !e.account.trim().is_empty())
        .collect()
}

/// `SignerListSet` installing `entries` with `quorum`
pub fn signer_list_set_draft(entries: &[SignerEntry], quorum: u32) -> TransactionDraft {
    let signer_entries: Vec<_> = filled_entries(entries)
        .into_iter()
        .map(|e| {
            json!({
                "SignerEntry": {
                    "Account": e.account.trim(),
                    "SignerWeight": e.weight,
                }
            })
        })
        .collect();

    TransactionDraft::new(TransactionType::SignerListSet)
        .field("SignerQuorum", quorum)
        .field("SignerEntries", signer_entries)
}

/// `SignerListSet` deleting the account's signer list
pub fn signer_list_delete_draft() -> TransactionDraft {
    TransactionDraft::new(TransactionType::SignerListSet).field("SignerQuorum", 0)
}
