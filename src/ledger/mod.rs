//! External collaborators
//!
//! The ledger client (RPC) and the signing oracle (key derivation and
//! signatures) are traits; this crate never talks to the network or
//! touches private keys itself.

pub mod client;
pub mod oracle;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{LedgerClient, LedgerError};
pub use oracle::{Credential, OracleError, SigningOracle};
pub use types::{
    AccountInfo, DepositPreauthObject, Environment, LedgerObject, LedgerObjectType,
    LedgerSelector, LedgerSignerEntry, LedgerSignerEntryItem, SignerListObject, SubmitResponse,
    TicketObject, TransactionMeta, SUCCESS_CODE,
};
