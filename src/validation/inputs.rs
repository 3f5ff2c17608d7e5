//! Raw form inputs
//!
//! Everything arrives as text exactly as typed; parsing happens in the
//! validators so malformed data becomes a message instead of an error.

use crate::core::FlagConfig;
use crate::multisig::SignerEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-supplied inputs of one action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationInputs {
    /// Address of the selected account; derived from `seed` when blank
    pub account: String,
    pub seed: String,
    pub memo: String,

    // sequencing
    pub is_ticket: bool,
    pub ticket_sequence: String,
    pub ticket_count: String,

    // signing path
    pub use_multi_sign: bool,
    /// Comma or whitespace delimited signer addresses
    pub multi_sign_addresses: String,
    /// Comma or whitespace delimited signer seeds, paired by position
    pub multi_sign_seeds: String,
    pub is_regular_key: bool,
    pub regular_key_seed: String,
    pub master_key_disabled: bool,

    // account configuration
    pub flags: FlagConfig,
    pub regular_key_configured: bool,
    pub signer_list_configured: bool,
    pub signer_entries: Vec<SignerEntry>,
    pub quorum: String,
    pub regular_key_address: String,
    pub authorized_address: String,
    /// Revoke instead of grant deposit preauthorization
    pub unauthorize: bool,

    // payments and checks
    pub destination: String,
    pub amount: String,
    pub check_id: String,

    // credentials
    pub subject: String,
    pub issuer: String,
    pub credential_type: String,

    // AMM
    pub asset_currency: String,
    pub asset_issuer: String,
    pub asset_amount: String,
    pub trading_fee: String,
}

/// A named input, as shown in messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Account,
    Seed,
    TicketCount,
    TicketSequence,
    Quorum,
    RegularKey,
    Authorize,
    Destination,
    Amount,
    CheckId,
    Subject,
    Issuer,
    CredentialType,
    Asset2Currency,
    Asset2Issuer,
    Amount2,
    TradingFee,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Account => "Account",
            Field::Seed => "Seed",
            Field::TicketCount => "TicketCount",
            Field::TicketSequence => "TicketSequence",
            Field::Quorum => "Quorum",
            Field::RegularKey => "RegularKey",
            Field::Authorize => "Authorize",
            Field::Destination => "Destination",
            Field::Amount => "Amount",
            Field::CheckId => "CheckID",
            Field::Subject => "Subject",
            Field::Issuer => "Issuer",
            Field::CredentialType => "CredentialType",
            Field::Asset2Currency => "Asset2Currency",
            Field::Asset2Issuer => "Asset2Issuer",
            Field::Amount2 => "Amount2",
            Field::TradingFee => "TradingFee",
        }
    }

    /// Raw text of this field in `inputs`
    pub fn value<'a>(&self, inputs: &'a ValidationInputs) -> &'a str {
        let raw = match self {
            Field::Account => &inputs.account,
            Field::Seed => &inputs.seed,
            Field::TicketCount => &inputs.ticket_count,
            Field::TicketSequence => &inputs.ticket_sequence,
            Field::Quorum => &inputs.quorum,
            Field::RegularKey => &inputs.regular_key_address,
            Field::Authorize => &inputs.authorized_address,
            Field::Destination => &inputs.destination,
            Field::Amount => &inputs.amount,
            Field::CheckId => &inputs.check_id,
            Field::Subject => &inputs.subject,
            Field::Issuer => &inputs.issuer,
            Field::CredentialType => &inputs.credential_type,
            Field::Asset2Currency => &inputs.asset_currency,
            Field::Asset2Issuer => &inputs.asset_issuer,
            Field::Amount2 => &inputs.asset_amount,
            Field::TradingFee => &inputs.trading_fee,
        };
        raw.trim()
    }

    pub fn is_present(&self, inputs: &ValidationInputs) -> bool {
        !self.value(inputs).is_empty()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_form() {
        let inputs: ValidationInputs = serde_json::from_str(
            r#"{
                "seed": " snoPBrXtMeMyMHUVTgbuqAfg1SUTb ",
                "useMultiSign": true,
                "multiSignAddresses": "addr1,addr2",
                "flags": { "set": ["NoFreeze"] },
                "signerEntries": [{ "account": "r1", "seed": "s1", "weight": "2" }]
            }"#,
        )
        .unwrap();

        assert!(inputs.use_multi_sign);
        assert_eq!(Field::Seed.value(&inputs), "snoPBrXtMeMyMHUVTgbuqAfg1SUTb");
        assert!(!Field::TicketCount.is_present(&inputs));
        assert_eq!(inputs.signer_entries[0].weight, 2);
        assert_eq!(inputs.flags.set.len(), 1);
    }
}
