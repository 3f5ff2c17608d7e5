//! Action orchestration
//!
//! This module contains:
//! - The per-action lifecycle (`Idle -> Validating -> Building -> Signing -> Submitting`)
//! - Draft construction from validated inputs
//! - Per-account locking and the busy indicator
//! - The submission flow and its error type

pub mod busy;
pub mod drafts;
pub mod lock;
pub mod state;
pub mod submit;

pub use busy::{BusyGuard, BusyIndicator};
pub use drafts::drafts_for;
pub use lock::AccountLocks;
pub use state::{ActionState, ActionTrail};
pub use submit::{ActionReport, SubmitError, TransactionOrchestrator};
