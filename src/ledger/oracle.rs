//! Signing oracle boundary
//!
//! Key derivation, signing and binary encoding are delegated. A
//! [`Credential`] is whatever the oracle derives from a seed.

use crate::core::{SignedTransaction, Transaction};
use crate::crypto::{address_from_public_key, AddressError};
use crate::ledger::types::Environment;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the signing oracle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
    #[error("Signing failed: {0}")]
    SigningFailed(String),
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// A signing credential derived from a seed
#[async_trait]
pub trait Credential: Send + Sync {
    /// Hex-encoded signing public key
    fn public_key(&self) -> &str;

    /// Address whose account id is derived from the public key
    fn classic_address(&self) -> Result<String, AddressError> {
        address_from_public_key(self.public_key())
    }

    /// Single-signature signing: fills `SigningPubKey` and `TxnSignature`
    async fn sign(&self, tx: &Transaction) -> Result<SignedTransaction, OracleError>;

    /// Detached signature over the multi-signing hash of `tx` for `signer_account`
    async fn sign_as_signer(
        &self,
        tx: &Transaction,
        signer_account: &str,
    ) -> Result<String, OracleError>;
}

#[async_trait]
pub trait SigningOracle: Send + Sync {
    /// Derive a credential; `Ok(None)` means the seed cannot be used
    async fn wallet(
        &self,
        seed: &str,
        environment: Environment,
    ) -> Result<Option<Box<dyn Credential>>, OracleError>;

    /// Serialize a transaction whose `Signers` array is already complete
    async fn encode_multisigned(&self, tx: &Transaction) -> Result<SignedTransaction, OracleError>;
}
