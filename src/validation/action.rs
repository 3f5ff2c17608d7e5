//! Per-action validation tables

use crate::validation::inputs::{Field, ValidationInputs};
use crate::validation::rules::{self, required_message, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Every user action the console can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    GetAccountDetails,
    UpdateFlags,
    SetMultiSign,
    RemoveMultiSign,
    SetRegularKey,
    RemoveRegularKey,
    SetDepositAuthAccounts,
    CreateTicket,
    CreateCheck,
    CashCheck,
    CancelCheck,
    CreateAmm,
    DepositAmm,
    WithdrawAmm,
    CreateCredential,
    AcceptCredential,
    DeleteCredential,
}

/// What an action requires of its inputs
#[derive(Debug, Clone, Copy)]
pub struct ActionRules {
    /// Fields that must be non-empty
    pub required: &'static [Field],
    /// Conditional validators, run in order
    pub validators: &'static [Validator],
    /// Whether the action signs and submits a transaction
    pub submits: bool,
}

/// Checks shared by every action
const ACCOUNT_CHECKS: &[Validator] = &[rules::account_address, rules::account_seed];

/// Checks shared by every submitting action
const SIGNING_CHECKS: &[Validator] = &[
    rules::ticket_sequence,
    rules::master_key_policy,
    rules::regular_key_seed,
    rules::multi_sign_pairing,
    rules::multi_sign_addresses,
    rules::multi_sign_seeds,
];

impl ActionKind {
    pub const ALL: [ActionKind; 17] = [
        ActionKind::GetAccountDetails,
        ActionKind::UpdateFlags,
        ActionKind::SetMultiSign,
        ActionKind::RemoveMultiSign,
        ActionKind::SetRegularKey,
        ActionKind::RemoveRegularKey,
        ActionKind::SetDepositAuthAccounts,
        ActionKind::CreateTicket,
        ActionKind::CreateCheck,
        ActionKind::CashCheck,
        ActionKind::CancelCheck,
        ActionKind::CreateAmm,
        ActionKind::DepositAmm,
        ActionKind::WithdrawAmm,
        ActionKind::CreateCredential,
        ActionKind::AcceptCredential,
        ActionKind::DeleteCredential,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::GetAccountDetails => "getAccountDetails",
            ActionKind::UpdateFlags => "updateFlags",
            ActionKind::SetMultiSign => "setMultiSign",
            ActionKind::RemoveMultiSign => "removeMultiSign",
            ActionKind::SetRegularKey => "setRegularKey",
            ActionKind::RemoveRegularKey => "removeRegularKey",
            ActionKind::SetDepositAuthAccounts => "setDepositAuthAccounts",
            ActionKind::CreateTicket => "createTicket",
            ActionKind::CreateCheck => "createCheck",
            ActionKind::CashCheck => "cashCheck",
            ActionKind::CancelCheck => "cancelCheck",
            ActionKind::CreateAmm => "createAmm",
            ActionKind::DepositAmm => "depositAmm",
            ActionKind::WithdrawAmm => "withdrawAmm",
            ActionKind::CreateCredential => "createCredential",
            ActionKind::AcceptCredential => "acceptCredential",
            ActionKind::DeleteCredential => "deleteCredential",
        }
    }

    pub fn rules(&self) -> ActionRules {
        use rules::*;

        match self {
            ActionKind::GetAccountDetails => ActionRules {
                required: &[Field::Seed],
                validators: &[],
                submits: false,
            },
            ActionKind::UpdateFlags => ActionRules {
                required: &[Field::Seed],
                validators: &[
                    flags_selected,
                    flags_consistent,
                    flags_single_ticket,
                    freeze_conflict,
                    master_lockout,
                ],
                submits: true,
            },
            ActionKind::SetMultiSign => ActionRules {
                required: &[Field::Seed, Field::Quorum],
                validators: &[
                    signer_list_not_empty,
                    signer_list_excludes_account,
                    signer_list_addresses,
                    signer_list_seeds,
                    signer_list_weights,
                    signer_list_unique,
                    signer_list_size,
                    quorum_positive,
                    quorum_reachable,
                ],
                submits: true,
            },
            ActionKind::RemoveMultiSign | ActionKind::RemoveRegularKey => ActionRules {
                required: &[Field::Seed],
                validators: &[],
                submits: true,
            },
            ActionKind::SetRegularKey => ActionRules {
                required: &[Field::Seed, Field::RegularKey],
                validators: &[regular_key_address],
                submits: true,
            },
            ActionKind::SetDepositAuthAccounts => ActionRules {
                required: &[Field::Seed, Field::Authorize],
                validators: &[authorized_address],
                submits: true,
            },
            ActionKind::CreateTicket => ActionRules {
                required: &[Field::Seed, Field::TicketCount],
                validators: &[ticket_count],
                submits: true,
            },
            ActionKind::CreateCheck => ActionRules {
                required: &[Field::Seed, Field::Destination, Field::Amount],
                validators: &[destination, amount],
                submits: true,
            },
            ActionKind::CashCheck => ActionRules {
                required: &[Field::Seed, Field::CheckId, Field::Amount],
                validators: &[check_id, amount],
                submits: true,
            },
            ActionKind::CancelCheck => ActionRules {
                required: &[Field::Seed, Field::CheckId],
                validators: &[check_id],
                submits: true,
            },
            ActionKind::CreateAmm => ActionRules {
                required: &[
                    Field::Seed,
                    Field::Amount,
                    Field::Asset2Currency,
                    Field::Asset2Issuer,
                    Field::Amount2,
                    Field::TradingFee,
                ],
                validators: &[amount, asset_currency, asset_issuer, asset_amount, trading_fee],
                submits: true,
            },
            ActionKind::DepositAmm => ActionRules {
                required: &[
                    Field::Seed,
                    Field::Amount,
                    Field::Asset2Currency,
                    Field::Asset2Issuer,
                ],
                validators: &[amount, asset_currency, asset_issuer],
                submits: true,
            },
            ActionKind::WithdrawAmm => ActionRules {
                required: &[
                    Field::Seed,
                    Field::Amount,
                    Field::Asset2Currency,
                    Field::Asset2Issuer,
                ],
                validators: &[amount, asset_currency, asset_issuer],
                submits: true,
            },
            ActionKind::CreateCredential => ActionRules {
                required: &[Field::Seed, Field::Subject, Field::CredentialType],
                validators: &[subject, credential_type],
                submits: true,
            },
            ActionKind::AcceptCredential => ActionRules {
                required: &[Field::Seed, Field::Issuer, Field::CredentialType],
                validators: &[issuer, credential_type],
                submits: true,
            },
            ActionKind::DeleteCredential => ActionRules {
                required: &[Field::Seed, Field::CredentialType],
                validators: &[credential_party, subject, issuer, credential_type],
                submits: true,
            },
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .iter()
            .copied()
            .find(|action| action.name() == s)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}

/// Run every check of `action` and collect all failure messages
///
/// An empty result means the action may proceed. Checks never stop at the
/// first failure.
pub fn validate(inputs: &ValidationInputs, action: ActionKind) -> Vec<String> {
    let rules = action.rules();

    let mut errors: Vec<String> = rules
        .required
        .iter()
        .filter(|field| !field.is_present(inputs))
        .map(|field| required_message(*field))
        .collect();

    let signing: &[Validator] = if rules.submits { SIGNING_CHECKS } else { &[] };
    errors.extend(
        ACCOUNT_CHECKS
            .iter()
            .chain(signing)
            .chain(rules.validators)
            .filter_map(|check| check(inputs)),
    );

    if !errors.is_empty() {
        log::debug!("{} failed validation with {} error(s)", action, errors.len());
    }
    errors
}

/// Validate an action given by name
pub fn validate_named(inputs: &ValidationInputs, action: &str) -> Result<Vec<String>, ActionError> {
    Ok(validate(inputs, action.parse()?))
}
