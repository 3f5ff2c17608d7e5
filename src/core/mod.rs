//! Core ledger data types
//!
//! This module contains:
//! - The transaction model and drafts
//! - Fee arithmetic in drops
//! - Account flags
//! - The UI-facing action outcome

pub mod fee;
pub mod flags;
pub mod outcome;
pub mod transaction;

pub use fee::{multisign_fee, Drops, DROPS_PER_XRP};
pub use flags::{AccountFlag, AccountRootFlags, FlagConfig};
pub use outcome::{TransactionOutcome, ERROR_PREFIX};
pub use transaction::{
    IssuedAmount, Memo, MemoItem, Precondition, SequenceSource, SignedTransaction, Signer,
    SignerItem, Transaction, TransactionDraft, TransactionType, TF_SINGLE_ASSET,
};
