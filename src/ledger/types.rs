//! Ledger response shapes consumed by the core

use crate::core::{AccountRootFlags, Drops};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Result code of a transaction the ledger applied successfully
pub const SUCCESS_CODE: &str = "tesSUCCESS";

/// Network the console is connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Mainnet => write!(f, "mainnet"),
            Environment::Testnet => write!(f, "testnet"),
            Environment::Devnet => write!(f, "devnet"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Environment::Mainnet),
            "testnet" => Ok(Environment::Testnet),
            "devnet" => Ok(Environment::Devnet),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

/// Which ledger version a query reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSelector {
    Validated,
    Current,
}

/// `account_data` of an `account_info` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountInfo {
    pub account: String,
    pub balance: Drops,
    pub sequence: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_key: Option<String>,
    #[serde(default)]
    pub owner_count: u32,
}

impl AccountInfo {
    pub fn root_flags(&self) -> AccountRootFlags {
        AccountRootFlags::from_bits_truncate(self.flags)
    }

    pub fn master_disabled(&self) -> bool {
        self.root_flags().master_disabled()
    }
}

// =============================================================================
// Ledger objects
// =============================================================================

/// Filter for `account_objects`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerObjectType {
    SignerList,
    Ticket,
    DepositPreauth,
}

/// Inner `SignerEntry` of an on-ledger signer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LedgerSignerEntry {
    pub account: String,
    pub signer_weight: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSignerEntryItem {
    #[serde(rename = "SignerEntry")]
    pub signer_entry: LedgerSignerEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerListObject {
    pub signer_entries: Vec<LedgerSignerEntryItem>,
    pub signer_quorum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketObject {
    pub ticket_sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepositPreauthObject {
    pub account: String,
    pub authorize: String,
}

/// An entry of an `account_objects` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "LedgerEntryType")]
pub enum LedgerObject {
    SignerList(SignerListObject),
    Ticket(TicketObject),
    DepositPreauth(DepositPreauthObject),
    #[serde(other)]
    Other,
}

impl LedgerObject {
    pub fn object_type(&self) -> Option<LedgerObjectType> {
        match self {
            LedgerObject::SignerList(_) => Some(LedgerObjectType::SignerList),
            LedgerObject::Ticket(_) => Some(LedgerObjectType::Ticket),
            LedgerObject::DepositPreauth(_) => Some(LedgerObjectType::DepositPreauth),
            LedgerObject::Other => None,
        }
    }
}

// =============================================================================
// Submission
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMeta {
    #[serde(rename = "TransactionResult")]
    pub transaction_result: String,
}

/// Result of submit-and-wait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub hash: String,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    /// The complete response, rendered to the user
    #[serde(default)]
    pub raw: Value,
}

impl SubmitResponse {
    pub fn result_code(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.transaction_result.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.result_code() == Some(SUCCESS_CODE)
    }

    /// Pretty JSON of the raw response for display
    pub fn render(&self) -> String {
        let body = if self.raw.is_null() {
            serde_json::to_value(self).unwrap_or(Value::Null)
        } else {
            self.raw.clone()
        };
        serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_info_from_ledger_json() {
        let info: AccountInfo = serde_json::from_value(json!({
            "Account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "Balance": "100000000",
            "Sequence": 5,
            "Flags": 0x0010_0000u32,
            "OwnerCount": 2,
            "LedgerEntryType": "AccountRoot"
        }))
        .unwrap();

        assert_eq!(info.balance, Drops(100_000_000));
        assert!(info.master_disabled());
        assert!(info.regular_key.is_none());
    }

    #[test]
    fn test_ledger_objects_tagged() {
        let objects: Vec<LedgerObject> = serde_json::from_value(json!([
            {
                "LedgerEntryType": "SignerList",
                "SignerEntries": [
                    {"SignerEntry": {"Account": "raJ1Aqkhf19P7cyUc33MMVAzgvHPvtNFC", "SignerWeight": 2}}
                ],
                "SignerQuorum": 2,
                "Flags": 0
            },
            {"LedgerEntryType": "Ticket", "TicketSequence": 12, "Account": "r"},
            {"LedgerEntryType": "RippleState", "Balance": {}}
        ]))
        .unwrap();

        assert_eq!(objects[0].object_type(), Some(LedgerObjectType::SignerList));
        assert_eq!(
            objects[1],
            LedgerObject::Ticket(TicketObject { ticket_sequence: 12 })
        );
        assert_eq!(objects[2], LedgerObject::Other);
    }

    #[test]
    fn test_submit_response_classification() {
        let ok = SubmitResponse {
            hash: "AB".to_string(),
            validated: true,
            meta: Some(TransactionMeta {
                transaction_result: SUCCESS_CODE.to_string(),
            }),
            raw: json!({"hash": "AB"}),
        };
        assert!(ok.is_success());
        assert!(ok.render().contains("AB"));

        let rejected = SubmitResponse {
            meta: Some(TransactionMeta {
                transaction_result: "tecUNFUNDED".to_string(),
            }),
            ..ok
        };
        assert!(!rejected.is_success());
        assert_eq!(rejected.result_code(), Some("tecUNFUNDED"));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("Mainnet".parse::<Environment>(), Ok(Environment::Mainnet));
        assert!("moon".parse::<Environment>().is_err());
    }
}
