//! XRPL Multi-Sign: signing coordination and input validation for an XRP Ledger console
//!
//! This crate provides the core behind a wallet console:
//! - Input validation for every console action, reporting all failures at once
//! - Multi-signature collection with the `(signers + 1) * base` fee rule
//! - Quorum clamping and signer list management
//! - Regular-key signing for accounts with the master key disabled
//! - Ticket-sequenced transactions and `LastLedgerSequence` windows
//! - A key/value store for signer lists and regular keys
//!
//! The ledger RPC and key handling are supplied through the
//! [`ledger::LedgerClient`] and [`ledger::SigningOracle`] traits.
//!
//! # Example
//!
//! ```rust
//! use xrpl_multisign::core::{multisign_fee, Drops};
//! use xrpl_multisign::multisig::{validate_quorum, SignerEntry};
//!
//! let signers = vec![SignerEntry::new("rA", "sA", 2), SignerEntry::new("rB", "sB", 3)];
//!
//! // A quorum above the total weight is lowered to it
//! assert_eq!(validate_quorum(&signers, 10), 5);
//!
//! // Three signatures cost four base fees
//! assert_eq!(multisign_fee(Drops::new(10), 3), Drops::new(40));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod ledger;
pub mod multisig;
pub mod orchestrator;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, ConsoleConfig};
pub use core::{
    multisign_fee, AccountFlag, Drops, FlagConfig, SignedTransaction, Transaction,
    TransactionDraft, TransactionOutcome, TransactionType,
};
pub use crypto::{detect_seed_format, is_valid_classic_address, SeedFormat};
pub use ledger::{Environment, LedgerClient, LedgerError, SigningOracle};
pub use multisig::{
    validate_quorum, CollectionMode, MultiSignCoordinator, MultiSignError, MultiSignRequest,
    MultiSignResult, SignerEntry, SignerRegistry,
};
pub use orchestrator::{ActionReport, ActionState, SubmitError, TransactionOrchestrator};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use validation::{validate, ActionKind, ValidationInputs};
