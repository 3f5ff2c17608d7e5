//! Drafts for validated inputs

use crate::core::{Drops, IssuedAmount, TransactionDraft};
use crate::multisig::{signer_list_delete_draft, signer_list_set_draft, validate_quorum};
use crate::validation::rules::SINGLE_TICKET_MESSAGE;
use crate::validation::{ActionKind, Field, ValidationInputs};

/// Transactions `action` sends, in submission order
///
/// Expects validated inputs; anything that still fails to parse is
/// returned as a message. Read-only actions produce no drafts.
pub fn drafts_for(action: ActionKind, inputs: &ValidationInputs) -> Result<Vec<TransactionDraft>, String> {
    let drafts = match action {
        ActionKind::GetAccountDetails => Vec::new(),
        ActionKind::UpdateFlags => inputs.flags.account_set_drafts(),
        ActionKind::SetMultiSign => {
            let requested = parse_number::<u32>(inputs, Field::Quorum)?;
            let quorum = validate_quorum(&inputs.signer_entries, requested);
            vec![signer_list_set_draft(&inputs.signer_entries, quorum)]
        }
        ActionKind::RemoveMultiSign => vec![signer_list_delete_draft()],
        ActionKind::SetRegularKey => vec![TransactionDraft::set_regular_key(Some(
            Field::RegularKey.value(inputs),
        ))],
        ActionKind::RemoveRegularKey => vec![TransactionDraft::set_regular_key(None)],
        ActionKind::SetDepositAuthAccounts => {
            let address = Field::Authorize.value(inputs);
            if inputs.unauthorize {
                vec![TransactionDraft::deposit_unauthorize(address)]
            } else {
                vec![TransactionDraft::deposit_authorize(address)]
            }
        }
        ActionKind::CreateTicket => {
            vec![TransactionDraft::ticket_create(parse_number(inputs, Field::TicketCount)?)]
        }
        ActionKind::CreateCheck => vec![TransactionDraft::check_create(
            Field::Destination.value(inputs),
            parse_xrp(inputs, Field::Amount)?,
        )],
        ActionKind::CashCheck => vec![TransactionDraft::check_cash(
            Field::CheckId.value(inputs),
            parse_xrp(inputs, Field::Amount)?,
        )],
        ActionKind::CancelCheck => vec![TransactionDraft::check_cancel(Field::CheckId.value(inputs))],
        ActionKind::CreateAmm => {
            let asset2 = IssuedAmount {
                currency: Field::Asset2Currency.value(inputs).to_string(),
                issuer: Field::Asset2Issuer.value(inputs).to_string(),
                value: Field::Amount2.value(inputs).to_string(),
            };
            vec![TransactionDraft::amm_create(
                parse_xrp(inputs, Field::Amount)?,
                &asset2,
                parse_number(inputs, Field::TradingFee)?,
            )]
        }
        ActionKind::DepositAmm => vec![TransactionDraft::amm_deposit(
            parse_xrp(inputs, Field::Amount)?,
            Field::Asset2Currency.value(inputs),
            Field::Asset2Issuer.value(inputs),
        )],
        ActionKind::WithdrawAmm => vec![TransactionDraft::amm_withdraw(
            parse_xrp(inputs, Field::Amount)?,
            Field::Asset2Currency.value(inputs),
            Field::Asset2Issuer.value(inputs),
        )],
        ActionKind::CreateCredential => vec![TransactionDraft::credential_create(
            Field::Subject.value(inputs),
            Field::CredentialType.value(inputs),
        )],
        ActionKind::AcceptCredential => vec![TransactionDraft::credential_accept(
            Field::Issuer.value(inputs),
            Field::CredentialType.value(inputs),
        )],
        ActionKind::DeleteCredential => vec![TransactionDraft::credential_delete(
            Field::Subject.value(inputs),
            Field::Issuer.value(inputs),
            Field::CredentialType.value(inputs),
        )],
    };

    let ticket = if inputs.is_ticket {
        Some(parse_number::<u32>(inputs, Field::TicketSequence)?)
    } else {
        None
    };
    if ticket.is_some() && drafts.len() > 1 {
        return Err(SINGLE_TICKET_MESSAGE.to_string());
    }

    Ok(drafts
        .into_iter()
        .map(|draft| {
            let draft = draft.memo(&inputs.memo);
            match ticket {
                Some(ticket) => draft.ticket(ticket),
                None => draft,
            }
        })
        .collect())
}

fn parse_number<T: std::str::FromStr>(inputs: &ValidationInputs, field: Field) -> Result<T, String> {
    field
        .value(inputs)
        .parse()
        .map_err(|_| format!("{} must be a whole number", field))
}

fn parse_xrp(inputs: &ValidationInputs, field: Field) -> Result<Drops, String> {
    Drops::from_xrp(field.value(inputs)).ok_or_else(|| format!("{} is not a valid XRP amount", field))
}
