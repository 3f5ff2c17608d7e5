//! Transaction submission
//!
//! One call per user action: validate, build, sign along exactly one
//! signing path, submit, classify. Every failure is contained here and
//! turned into a [`TransactionOutcome`].

use crate::config::ConsoleConfig;
use crate::core::{
    Drops, Precondition, SequenceSource, SignedTransaction, Transaction, TransactionDraft,
    TransactionOutcome,
};
use crate::crypto::AddressError;
use crate::ledger::{
    AccountInfo, Credential, Environment, LedgerClient, LedgerError, LedgerObject,
    LedgerObjectType, LedgerSelector, OracleError, SigningOracle,
};
use crate::multisig::{
    MultiSignCoordinator, MultiSignError, MultiSignRequest, RegistryError, SignerRegistry,
};
use crate::orchestrator::busy::BusyIndicator;
use crate::orchestrator::drafts::drafts_for;
use crate::orchestrator::lock::AccountLocks;
use crate::orchestrator::state::{ActionState, ActionTrail};
use crate::storage::KeyValueStore;
use crate::validation::{validate, ActionKind, Field, ValidationInputs};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why an action did not complete
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Ticket Sequence {ticket} not found for account {account}")]
    TicketNotFound { ticket: u32, account: String },
    #[error("Wallet could not be created or is undefined")]
    WalletUnavailable,
    #[error("No regular key seed available for {0}")]
    RegularKeyUnavailable(String),
    #[error("Insufficient XRP balance to cover amount and fee")]
    InsufficientBalance { balance: Drops, required: Drops },
    #[error("{0} is already preauthorized")]
    DepositPreauthExists(String),
    #[error("{0} is not preauthorized")]
    DepositPreauthMissing(String),
    #[error("{0}")]
    NoSignatureCollected(String),
    #[error("{0}")]
    Address(#[from] AddressError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Oracle(#[from] OracleError),
    #[error("{0}")]
    Registry(#[from] RegistryError),
    #[error("Transaction rejected with {code}")]
    Rejected { code: String, response: String },
}

impl SubmitError {
    /// The outcome shown for this failure
    ///
    /// A ledger rejection keeps the raw response; everything else becomes
    /// `ERROR: <message>`.
    pub fn into_outcome(self) -> TransactionOutcome {
        match self {
            SubmitError::Rejected { response, .. } => TransactionOutcome::rejected(response),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    TransactionOutcome::failure("Unknown error")
                } else {
                    TransactionOutcome::failure(&message)
                }
            }
        }
    }
}

/// Outcome of one action plus the states it passed through
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub outcome: TransactionOutcome,
    pub trail: ActionTrail,
}

pub struct TransactionOrchestrator<L, O, S>
where
    L: LedgerClient + ?Sized,
    O: SigningOracle + ?Sized,
    S: KeyValueStore,
{
    client: Arc<L>,
    oracle: Arc<O>,
    registry: SignerRegistry<S>,
    coordinator: MultiSignCoordinator<O>,
    environment: Environment,
    validity_window: u32,
    locks: AccountLocks,
    busy: BusyIndicator,
}

impl<L, O, S> TransactionOrchestrator<L, O, S>
where
    L: LedgerClient + ?Sized,
    O: SigningOracle + ?Sized,
    S: KeyValueStore,
{
    pub fn new(client: Arc<L>, oracle: Arc<O>, store: Arc<S>, config: &ConsoleConfig) -> Self {
        Self {
            client,
            coordinator: MultiSignCoordinator::new(Arc::clone(&oracle), config.collection_mode),
            oracle,
            registry: SignerRegistry::new(store),
            environment: config.environment,
            validity_window: config.validity_window,
            locks: AccountLocks::new(),
            busy: BusyIndicator::new(),
        }
    }

    pub fn registry(&self) -> &SignerRegistry<S> {
        &self.registry
    }

    /// Handle on the indicator shown while actions run
    pub fn busy(&self) -> BusyIndicator {
        self.busy.clone()
    }

    pub async fn submit(&self, action: ActionKind, inputs: &ValidationInputs) -> TransactionOutcome {
        self.run(action, inputs).await.outcome
    }

    /// Run `action` to completion and report how it went
    pub async fn run(&self, action: ActionKind, inputs: &ValidationInputs) -> ActionReport {
        let _busy = self.busy.begin();
        let started = Instant::now();
        let mut trail = ActionTrail::new();

        let outcome = match self.execute(action, inputs, &mut trail).await {
            Ok(result) => {
                trail.advance(ActionState::Success);
                log::info!("{} completed", action);
                TransactionOutcome::success(result)
            }
            Err(e) => {
                trail.advance(ActionState::Failed);
                log::warn!("{} failed: {}", action, e);
                e.into_outcome()
            }
        };

        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        ActionReport {
            outcome: outcome.with_execution_time(elapsed),
            trail,
        }
    }

    async fn execute(
        &self,
        action: ActionKind,
        inputs: &ValidationInputs,
        trail: &mut ActionTrail,
    ) -> Result<String, SubmitError> {
        trail.advance(ActionState::Validating);
        let errors = validate(inputs, action);
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }
        let drafts = drafts_for(action, inputs).map_err(|e| SubmitError::Validation(vec![e]))?;

        let wallet = self.derive(Field::Seed.value(inputs)).await?;
        let account = match Field::Account.value(inputs) {
            "" => wallet.classic_address()?,
            address => address.to_string(),
        };

        let _lock = self.locks.acquire(&account).await;

        if drafts.is_empty() {
            return self.account_details(&account).await;
        }

        let mut rendered = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            trail.advance(ActionState::Building);
            let (tx, info, base_fee) = self.build(&account, draft).await?;

            trail.advance(ActionState::Signing);
            let (signed, fee) = self
                .sign(inputs, &account, &info, tx, base_fee, wallet.as_ref())
                .await?;
            check_balance(&info, fee, draft.spend)?;

            trail.advance(ActionState::Submitting);
            log::info!(
                "Submitting {:?} for {} (fee {} drops)",
                draft.transaction_type,
                account,
                fee
            );
            let response = self.client.submit_and_wait(&signed.tx_blob).await?;
            let code = response.result_code().unwrap_or("unknown").to_string();
            if !response.is_success() {
                return Err(SubmitError::Rejected {
                    code,
                    response: response.render(),
                });
            }
            log::info!("{} validated with {}", response.hash, code);
            rendered.push(response.render());
        }

        if let Err(e) = self.record(action, inputs, &account) {
            log::warn!("Transaction applied but local signer data not updated: {}", e);
        }
        Ok(rendered.join("\n"))
    }

    async fn derive(&self, seed: &str) -> Result<Box<dyn Credential>, SubmitError> {
        self.oracle
            .wallet(seed, self.environment)
            .await?
            .ok_or(SubmitError::WalletUnavailable)
    }

    /// Unsigned transaction for `draft`, with the account state it was built on
    async fn build(
        &self,
        account: &str,
        draft: &TransactionDraft,
    ) -> Result<(Transaction, AccountInfo, Drops), SubmitError> {
        if let Some(ticket) = draft.ticket_sequence {
            if !self.client.check_ticket_exists(account, ticket).await? {
                return Err(SubmitError::TicketNotFound {
                    ticket,
                    account: account.to_string(),
                });
            }
        }
        self.check_preconditions(account, &draft.preconditions)
            .await?;

        let info = self
            .client
            .account_info(account, LedgerSelector::Current)
            .await?;
        let base_fee = self.client.calculate_transaction_fee().await?;
        let ledger_index = self.client.last_ledger_index().await?;

        let sequence = match draft.ticket_sequence {
            Some(ticket) => SequenceSource::Ticket(ticket),
            None => SequenceSource::Account(info.sequence),
        };
        let tx = draft.build(
            account,
            sequence,
            base_fee,
            ledger_index.saturating_add(self.validity_window),
        );
        Ok((tx, info, base_fee))
    }

    async fn check_preconditions(
        &self,
        account: &str,
        preconditions: &[Precondition],
    ) -> Result<(), SubmitError> {
        if preconditions.is_empty() {
            return Ok(());
        }

        let objects = self
            .client
            .account_objects(
                account,
                LedgerSelector::Validated,
                Some(LedgerObjectType::DepositPreauth),
            )
            .await?;
        let preauthorized = |address: &str| {
            objects.iter().any(|object| {
                matches!(object, LedgerObject::DepositPreauth(p) if p.authorize == address)
            })
        };

        for precondition in preconditions {
            match precondition {
                Precondition::DepositPreauthAbsent { authorize } if preauthorized(authorize) => {
                    return Err(SubmitError::DepositPreauthExists(authorize.clone()));
                }
                Precondition::DepositPreauthPresent { authorize } if !preauthorized(authorize) => {
                    return Err(SubmitError::DepositPreauthMissing(authorize.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Sign along exactly one path; returns the blob and the final fee
    async fn sign(
        &self,
        inputs: &ValidationInputs,
        account: &str,
        info: &AccountInfo,
        tx: Transaction,
        base_fee: Drops,
        wallet: &dyn Credential,
    ) -> Result<(SignedTransaction, Drops), SubmitError> {
        if inputs.use_multi_sign {
            let request = MultiSignRequest::from_raw(
                self.environment,
                tx,
                &inputs.multi_sign_addresses,
                &inputs.multi_sign_seeds,
                base_fee,
            );
            let result = self.coordinator.collect_signatures(request).await;
            if !result.is_complete() {
                return Err(SubmitError::NoSignatureCollected(result.failure_message()));
            }
            let fee = result.fee;
            return result.signed_tx.map(|signed| (signed, fee)).ok_or_else(|| {
                SubmitError::NoSignatureCollected(MultiSignError::NoSignatureCollected.to_string())
            });
        }

        let fee = tx.fee.unwrap_or(base_fee);
        if inputs.is_regular_key || inputs.master_key_disabled || info.master_disabled() {
            let seed = self.regular_key_seed(inputs, account)?;
            let credential = self.derive(&seed).await?;
            log::debug!("Signing for {} with its regular key", account);
            return Ok((credential.sign(&tx).await?, fee));
        }

        Ok((wallet.sign(&tx).await?, fee))
    }

    /// Typed regular key seed, else the one stored for `account`
    fn regular_key_seed(
        &self,
        inputs: &ValidationInputs,
        account: &str,
    ) -> Result<String, SubmitError> {
        let typed = inputs.regular_key_seed.trim();
        if !typed.is_empty() {
            return Ok(typed.to_string());
        }

        self.registry
            .load_regular_key(account)?
            .and_then(|key| key.seed)
            .ok_or_else(|| SubmitError::RegularKeyUnavailable(account.to_string()))
    }

    /// Mirror a successful configuration change into the local registry
    fn record(
        &self,
        action: ActionKind,
        inputs: &ValidationInputs,
        account: &str,
    ) -> Result<(), RegistryError> {
        match action {
            ActionKind::SetMultiSign => self.registry.save(account, &inputs.signer_entries),
            ActionKind::RemoveMultiSign => self.registry.remove(account),
            ActionKind::SetRegularKey => {
                // while signing with the old regular key the typed seed is not the new key's
                let seed = inputs.regular_key_seed.trim();
                let seed = (!inputs.is_regular_key && !seed.is_empty()).then_some(seed);
                self.registry
                    .save_regular_key(account, Field::RegularKey.value(inputs), seed)
            }
            ActionKind::RemoveRegularKey => self.registry.clear_regular_key(account),
            _ => Ok(()),
        }
    }

    async fn account_details(&self, account: &str) -> Result<String, SubmitError> {
        let info = self
            .client
            .account_info(account, LedgerSelector::Validated)
            .await?;
        let signers = self.registry.refresh(self.client.as_ref(), account).await?;
        let stored_key = self.registry.load_regular_key(account)?;

        let details = json!({
            "accountInfo": info,
            "masterKeyDisabled": info.master_disabled(),
            "signerList": signers.on_ledger,
            "quorum": signers.quorum,
            "regularKey": info.regular_key.clone().or(stored_key.map(|k| k.address)),
        });
        Ok(serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string()))
    }
}

fn check_balance(info: &AccountInfo, fee: Drops, spend: Option<Drops>) -> Result<(), SubmitError> {
    let required = fee.checked_add(spend.unwrap_or_default());
    match required {
        Some(required) if info.balance >= required => Ok(()),
        _ => Err(SubmitError::InsufficientBalance {
            balance: info.balance,
            required: required.unwrap_or(Drops(u64::MAX)),
        }),
    }
}
