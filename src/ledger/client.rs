//! Ledger client boundary
//!
//! Network access is owned by the implementor. The core only issues the
//! queries below; each is a fallible suspension point.

use crate::core::Drops;
use crate::ledger::types::{
    AccountInfo, LedgerObject, LedgerObjectType, LedgerSelector, SubmitResponse,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the ledger client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("{0}")]
    Rpc(String),
    #[error("Malformed ledger response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn account_info(
        &self,
        address: &str,
        ledger: LedgerSelector,
    ) -> Result<AccountInfo, LedgerError>;

    async fn account_objects(
        &self,
        address: &str,
        ledger: LedgerSelector,
        filter: Option<LedgerObjectType>,
    ) -> Result<Vec<LedgerObject>, LedgerError>;

    /// Current open-ledger base fee
    async fn calculate_transaction_fee(&self) -> Result<Drops, LedgerError>;

    /// Index of the most recent validated ledger
    async fn last_ledger_index(&self) -> Result<u32, LedgerError>;

    /// Submit a signed blob and wait until it is validated or expires
    async fn submit_and_wait(&self, tx_blob: &str) -> Result<SubmitResponse, LedgerError>;

    async fn check_ticket_exists(
        &self,
        address: &str,
        ticket_sequence: u32,
    ) -> Result<bool, LedgerError> {
        let tickets = self
            .account_objects(address, LedgerSelector::Validated, Some(LedgerObjectType::Ticket))
            .await?;

        Ok(tickets.iter().any(|object| {
            matches!(object, LedgerObject::Ticket(t) if t.ticket_sequence == ticket_sequence)
        }))
    }
}
