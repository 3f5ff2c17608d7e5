//! Multi-signature support
//!
//! Signer lists, quorum handling and signature collection for accounts
//! controlled by several keys.
//!
//! # Example
//!
//! ```ignore
//! use xrpl_multisign::multisig::{CollectionMode, MultiSignCoordinator, MultiSignRequest};
//!
//! let coordinator = MultiSignCoordinator::new(oracle, CollectionMode::Parallel);
//! let result = coordinator
//!     .collect_signatures(MultiSignRequest::from_raw(env, tx, "rA..,rB..", "sA..,sB..", base_fee))
//!     .await;
//!
//! // Fee is now (signers + 1) * base_fee and Signers are sorted by account id
//! let signed = result.signed_tx.ok_or_else(|| result.failure_message())?;
//! ```

pub mod coordinator;
pub mod quorum;
pub mod registry;
pub mod signer;

pub use coordinator::{
    split_list, CollectionMode, MultiSignCoordinator, MultiSignRequest, MultiSignResult,
};
pub use quorum::{total_weight, validate_quorum};
pub use registry::{RegistryError, RegularKey, SignerListSummary, SignerRegistry, SignerState};
pub use signer::{
    add_signer, default_entries, filled_entries, remove_signer, signer_list_delete_draft,
    signer_list_set_draft, MultiSignError, SignerEntry, MAX_SIGNER_ENTRIES,
};
