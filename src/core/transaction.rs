//! Transaction model
//!
//! Transactions are kept in the ledger's JSON shape (PascalCase fields)
//! so the signing oracle and the ledger client can consume them directly.
//! Common fields are typed; type-specific fields live in `fields`.
//!
//! A [`TransactionDraft`] describes what the user asked for. The
//! orchestrator turns it into a [`Transaction`] once the account's
//! sequence (or ticket), the fee and the validity window are known.

use crate::core::fee::Drops;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// `tfSingleAsset` of AMM deposits and withdrawals
pub const TF_SINGLE_ASSET: u32 = 0x0008_0000;

// =============================================================================
// Transaction Types
// =============================================================================

/// Transaction types produced by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    AccountSet,
    SignerListSet,
    SetRegularKey,
    TicketCreate,
    DepositPreauth,
    Payment,
    CheckCreate,
    CheckCash,
    CheckCancel,
    #[serde(rename = "AMMCreate")]
    AmmCreate,
    #[serde(rename = "AMMDeposit")]
    AmmDeposit,
    #[serde(rename = "AMMWithdraw")]
    AmmWithdraw,
    CredentialCreate,
    CredentialAccept,
    CredentialDelete,
}

// =============================================================================
// Signers and Memos
// =============================================================================

/// One signature inside a multi-signed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Signer {
    pub account: String,
    pub signing_pub_key: String,
    pub txn_signature: String,
}

/// `{"Signer": {...}}` wrapper used by the `Signers` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerItem {
    #[serde(rename = "Signer")]
    pub signer: Signer,
}

/// A memo with hex-encoded payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memo {
    pub memo_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
}

impl Memo {
    /// Build a memo from plain text
    pub fn from_text(text: &str) -> Self {
        Self {
            memo_data: hex::encode_upper(text.as_bytes()),
            memo_type: None,
        }
    }
}

/// `{"Memo": {...}}` wrapper used by the `Memos` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoItem {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

// =============================================================================
// Transaction
// =============================================================================

/// A ledger transaction in JSON form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub transaction_type: TransactionType,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Drops>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<MemoItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<SignerItem>>,
    /// Type-specific fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Transaction {
    /// Number of signatures in the `Signers` array
    pub fn signer_count(&self) -> usize {
        self.signers.as_ref().map(Vec::len).unwrap_or(0)
    }

    /// Whether the transaction consumes a ticket instead of a sequence number
    pub fn uses_ticket(&self) -> bool {
        self.ticket_sequence.is_some()
    }
}

/// An issued-currency amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    pub issuer: String,
    pub value: String,
}

impl IssuedAmount {
    pub fn to_json(&self) -> Value {
        json!({
            "currency": self.currency,
            "issuer": self.issuer,
            "value": self.value,
        })
    }
}

/// A signed, serialized transaction ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx_blob: String,
    pub hash: String,
}

// =============================================================================
// Drafts
// =============================================================================

/// Where the transaction's ordering number comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSource {
    /// The account's next sequence number
    Account(u32),
    /// A previously created ticket; `Sequence` is then `0`
    Ticket(u32),
}

/// Checks against ledger state that must pass before signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Precondition {
    /// The account must not already preauthorize `authorize`
    DepositPreauthAbsent { authorize: String },
    /// The account must currently preauthorize `authorize`
    DepositPreauthPresent { authorize: String },
}

/// A user request for a transaction, before ledger-derived fields are known
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub transaction_type: TransactionType,
    pub fields: Map<String, Value>,
    pub flags: Option<u32>,
    pub memo: Option<String>,
    pub ticket_sequence: Option<u32>,
    /// Native amount leaving the account, checked against the balance
    pub spend: Option<Drops>,
    pub preconditions: Vec<Precondition>,
}

impl TransactionDraft {
    pub fn new(transaction_type: TransactionType) -> Self {
        Self {
            transaction_type,
            fields: Map::new(),
            flags: None,
            memo: None,
            ticket_sequence: None,
            spend: None,
            preconditions: Vec::new(),
        }
    }

    /// Set a type-specific field
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Set a native amount field; the amount is also counted as spend
    pub fn xrp_amount(mut self, name: &str, amount: Drops) -> Self {
        self.fields
            .insert(name.to_string(), Value::String(amount.to_string()));
        let spend = self.spend.unwrap_or_default();
        self.spend = Some(spend.checked_add(amount).unwrap_or(Drops(u64::MAX)));
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Attach a text memo; blank memos are ignored
    pub fn memo(mut self, memo: &str) -> Self {
        if !memo.trim().is_empty() {
            self.memo = Some(memo.to_string());
        }
        self
    }

    /// Consume a ticket instead of the account sequence
    pub fn ticket(mut self, ticket_sequence: u32) -> Self {
        self.ticket_sequence = Some(ticket_sequence);
        self
    }

    pub fn precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    /// Build the unsigned transaction skeleton
    ///
    /// Exactly one of `Sequence != 0` or `TicketSequence` is carried.
    pub fn build(
        &self,
        account: &str,
        sequence: SequenceSource,
        fee: Drops,
        last_ledger_sequence: u32,
    ) -> Transaction {
        let (sequence, ticket_sequence) = match sequence {
            SequenceSource::Account(seq) => (Some(seq), None),
            SequenceSource::Ticket(ticket) => (Some(0), Some(ticket)),
        };

        Transaction {
            transaction_type: self.transaction_type,
            account: account.to_string(),
            fee: Some(fee),
            sequence,
            ticket_sequence,
            last_ledger_sequence: Some(last_ledger_sequence),
            flags: self.flags,
            signing_pub_key: None,
            memos: self.memo.as_deref().map(|m| {
                vec![MemoItem {
                    memo: Memo::from_text(m),
                }]
            }),
            signers: None,
            fields: self.fields.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Common drafts
    // -------------------------------------------------------------------------

    /// `TicketCreate` for `count` tickets
    pub fn ticket_create(count: u32) -> Self {
        Self::new(TransactionType::TicketCreate).field("TicketCount", count)
    }

    /// `SetRegularKey`; `None` removes the current regular key
    pub fn set_regular_key(regular_key: Option<&str>) -> Self {
        let draft = Self::new(TransactionType::SetRegularKey);
        match regular_key {
            Some(key) => draft.field("RegularKey", key),
            None => draft,
        }
    }

    /// `DepositPreauth` authorizing `address`, guarded against duplicates
    pub fn deposit_authorize(address: &str) -> Self {
        Self::new(TransactionType::DepositPreauth)
            .field("Authorize", address)
            .precondition(Precondition::DepositPreauthAbsent {
                authorize: address.to_string(),
            })
    }

    /// `DepositPreauth` revoking `address`, guarded against missing entries
    pub fn deposit_unauthorize(address: &str) -> Self {
        Self::new(TransactionType::DepositPreauth)
            .field("Unauthorize", address)
            .precondition(Precondition::DepositPreauthPresent {
                authorize: address.to_string(),
            })
    }

    /// `CheckCreate` for a native amount; `SendMax` counts as spend
    pub fn check_create(destination: &str, send_max: Drops) -> Self {
        Self::new(TransactionType::CheckCreate)
            .field("Destination", destination)
            .xrp_amount("SendMax", send_max)
    }

    /// `CheckCash` for an exact native amount
    pub fn check_cash(check_id: &str, amount: Drops) -> Self {
        Self::new(TransactionType::CheckCash)
            .field("CheckID", check_id)
            .field("Amount", amount.to_string())
    }

    pub fn check_cancel(check_id: &str) -> Self {
        Self::new(TransactionType::CheckCancel).field("CheckID", check_id)
    }

    /// `CredentialCreate`; the credential type is hex-encoded
    pub fn credential_create(subject: &str, credential_type: &str) -> Self {
        Self::new(TransactionType::CredentialCreate)
            .field("Subject", subject)
            .field("CredentialType", hex::encode_upper(credential_type.as_bytes()))
    }

    pub fn credential_accept(issuer: &str, credential_type: &str) -> Self {
        Self::new(TransactionType::CredentialAccept)
            .field("Issuer", issuer)
            .field("CredentialType", hex::encode_upper(credential_type.as_bytes()))
    }

    pub fn credential_delete(subject: &str, issuer: &str, credential_type: &str) -> Self {
        Self::new(TransactionType::CredentialDelete)
            .field("Subject", subject)
            .field("Issuer", issuer)
            .field("CredentialType", hex::encode_upper(credential_type.as_bytes()))
    }

    /// `AMMCreate` pairing native `amount` with an issued asset
    pub fn amm_create(amount: Drops, asset2: &IssuedAmount, trading_fee: u16) -> Self {
        Self::new(TransactionType::AmmCreate)
            .xrp_amount("Amount", amount)
            .field("Amount2", asset2.to_json())
            .field("TradingFee", trading_fee)
    }

    /// Single-asset native deposit into the XRP / `currency` pool
    pub fn amm_deposit(amount: Drops, currency: &str, issuer: &str) -> Self {
        Self::new(TransactionType::AmmDeposit)
            .field("Asset", json!({ "currency": "XRP" }))
            .field("Asset2", json!({ "currency": currency, "issuer": issuer }))
            .xrp_amount("Amount", amount)
            .flags(TF_SINGLE_ASSET)
    }

    /// Single-asset native withdrawal from the XRP / `currency` pool
    pub fn amm_withdraw(amount: Drops, currency: &str, issuer: &str) -> Self {
        Self::new(TransactionType::AmmWithdraw)
            .field("Asset", json!({ "currency": "XRP" }))
            .field("Asset2", json!({ "currency": currency, "issuer": issuer }))
            .field("Amount", amount.to_string())
            .flags(TF_SINGLE_ASSET)
    }
}
