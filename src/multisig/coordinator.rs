//! Multi-signature collection
//!
//! Given an unsigned transaction and `(address, seed)` pairs, the
//! coordinator derives one credential per signer, applies the multi-sign
//! fee, collects one detached signature per signer and assembles the
//! `Signers` array in account-id order.
//!
//! Collection is all-or-nothing: a single failing signer yields
//! `signed_tx: None` together with the per-signer error messages.

use crate::core::{
    multisign_fee, Drops, SignedTransaction, Signer, SignerItem, Transaction,
};
use crate::crypto::{decode_classic_address, signing_key_algorithm};
use crate::ledger::{Credential, Environment, SigningOracle};
use crate::multisig::signer::{MultiSignError, MAX_SIGNER_ENTRIES};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// How per-signer requests are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// All signers at once
    #[default]
    Parallel,
    /// One signer after another, in input order
    Sequential,
}

/// Input of one collection round
#[derive(Debug, Clone)]
pub struct MultiSignRequest {
    pub environment: Environment,
    pub tx: Transaction,
    pub signer_addresses: Vec<String>,
    pub signer_seeds: Vec<String>,
    /// Base fee of a single-signed transaction
    pub fee: Drops,
}

impl MultiSignRequest {
    /// Build a request from the raw comma/whitespace-delimited form fields
    pub fn from_raw(
        environment: Environment,
        tx: Transaction,
        addresses: &str,
        seeds: &str,
        fee: Drops,
    ) -> Self {
        Self {
            environment,
            tx,
            signer_addresses: split_list(addresses),
            signer_seeds: split_list(seeds),
            fee,
        }
    }
}

/// Split a comma or whitespace delimited list, dropping empty items
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Output of one collection round
#[derive(Debug, Clone)]
pub struct MultiSignResult {
    /// `None` when no usable multi-signed transaction could be produced
    pub signed_tx: Option<SignedTransaction>,
    pub signers: Vec<Signer>,
    /// Transaction as signed, with the recomputed fee and `Signers`
    pub tx: Transaction,
    pub fee: Drops,
    /// One message per failed signer
    pub errors: Vec<String>,
}

impl MultiSignResult {
    fn failed(tx: Transaction, fee: Drops, errors: Vec<String>) -> Self {
        Self {
            signed_tx: None,
            signers: Vec::new(),
            tx,
            fee,
            errors,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.signed_tx.is_some()
    }

    /// Error text for an incomplete result
    pub fn failure_message(&self) -> String {
        let mut message = MultiSignError::NoSignatureCollected.to_string();
        if !self.errors.is_empty() {
            message = format!("{}: {}", message, self.errors.join("; "));
        }
        message
    }
}

pub struct MultiSignCoordinator<O: SigningOracle + ?Sized> {
    oracle: Arc<O>,
    mode: CollectionMode,
}

impl<O: SigningOracle + ?Sized> MultiSignCoordinator<O> {
    pub fn new(oracle: Arc<O>, mode: CollectionMode) -> Self {
        Self { oracle, mode }
    }

    pub fn mode(&self) -> CollectionMode {
        self.mode
    }

    /// Collect one signature per signer and combine them
    pub async fn collect_signatures(&self, request: MultiSignRequest) -> MultiSignResult {
        let MultiSignRequest {
            environment,
            mut tx,
            signer_addresses,
            signer_seeds,
            fee: base_fee,
        } = request;

        if let Err(e) = check_pairing(&signer_addresses, &signer_seeds) {
            return MultiSignResult::failed(tx, base_fee, vec![e.to_string()]);
        }

        // Derive every credential first; the signer count fixes the fee.
        let derivations = signer_addresses
            .iter()
            .zip(signer_seeds.iter())
            .map(|(address, seed)| self.derive(address, seed, environment));
        let derived = self.dispatch(derivations).await;

        let mut credentials = Vec::with_capacity(derived.len());
        let mut errors = Vec::new();
        for (address, outcome) in signer_addresses.iter().zip(derived) {
            match outcome {
                Ok(credential) => credentials.push((address.clone(), credential)),
                Err(e) => {
                    log::warn!("Signer {} unusable: {}", address, e);
                    errors.push(e.to_string());
                }
            }
        }
        if !errors.is_empty() {
            return MultiSignResult::failed(tx, base_fee, errors);
        }

        let fee = multisign_fee(base_fee, credentials.len());
        tx.fee = Some(fee);
        tx.signing_pub_key = Some(String::new());
        tx.signers = None;
        log::debug!(
            "Multi-sign fee for {} signers: {} drops",
            credentials.len(),
            fee
        );

        let signing = credentials
            .iter()
            .map(|(address, credential)| sign_one(&tx, address, credential.as_ref()));
        let signed = self.dispatch(signing).await;

        let mut signers = Vec::with_capacity(signed.len());
        for outcome in signed {
            match outcome {
                Ok(signer) => signers.push(signer),
                Err(e) => {
                    log::warn!("Signature collection failed: {}", e);
                    errors.push(e.to_string());
                }
            }
        }
        if !errors.is_empty() {
            return MultiSignResult::failed(tx, fee, errors);
        }

        let signers = match canonical_order(signers) {
            Ok(signers) => signers,
            Err(e) => return MultiSignResult::failed(tx, fee, vec![e.to_string()]),
        };

        tx.signers = Some(
            signers
                .iter()
                .cloned()
                .map(|signer| SignerItem { signer })
                .collect(),
        );

        match self.oracle.encode_multisigned(&tx).await {
            Ok(signed_tx) => {
                log::info!(
                    "Collected {} signatures for {} ({})",
                    signers.len(),
                    tx.account,
                    signed_tx.hash
                );
                MultiSignResult {
                    signed_tx: Some(signed_tx),
                    signers,
                    tx,
                    fee,
                    errors,
                }
            }
            Err(e) => {
                let message = MultiSignError::from(e).to_string();
                MultiSignResult {
                    signed_tx: None,
                    signers,
                    tx,
                    fee,
                    errors: vec![message],
                }
            }
        }
    }

    async fn derive(
        &self,
        address: &str,
        seed: &str,
        environment: Environment,
    ) -> Result<Box<dyn Credential>, MultiSignError> {
        let credential = match self.oracle.wallet(seed, environment).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                return Err(MultiSignError::WalletUnavailable {
                    address: address.to_string(),
                })
            }
            Err(e) => {
                return Err(MultiSignError::Derivation {
                    address: address.to_string(),
                    message: e.to_string(),
                })
            }
        };

        signing_key_algorithm(credential.public_key()).map_err(|source| {
            MultiSignError::InvalidPublicKey {
                address: address.to_string(),
                source,
            }
        })?;

        Ok(credential)
    }

    async fn dispatch<F, T>(&self, futures: impl IntoIterator<Item = F>) -> Vec<T>
    where
        F: Future<Output = T>,
    {
        match self.mode {
            CollectionMode::Parallel => join_all(futures).await,
            CollectionMode::Sequential => {
                let mut out = Vec::new();
                for future in futures {
                    out.push(future.await);
                }
                out
            }
        }
    }
}

fn check_pairing(addresses: &[String], seeds: &[String]) -> Result<(), MultiSignError> {
    if addresses.is_empty() || seeds.is_empty() {
        return Err(MultiSignError::EmptyRequest);
    }
    if addresses.len() != seeds.len() {
        return Err(MultiSignError::CountMismatch {
            addresses: addresses.len(),
            seeds: seeds.len(),
        });
    }
    if addresses.len() > MAX_SIGNER_ENTRIES {
        return Err(MultiSignError::TooManySigners(addresses.len()));
    }
    Ok(())
}

async fn sign_one(
    tx: &Transaction,
    address: &str,
    credential: &dyn Credential,
) -> Result<Signer, MultiSignError> {
    let txn_signature = credential
        .sign_as_signer(tx, address)
        .await
        .map_err(|e| MultiSignError::Signing {
            address: address.to_string(),
            message: e.to_string(),
        })?;

    Ok(Signer {
        account: address.to_string(),
        signing_pub_key: credential.public_key().to_string(),
        txn_signature,
    })
}

/// Sort signers by numeric account id, the order the ledger requires
fn canonical_order(signers: Vec<Signer>) -> Result<Vec<Signer>, MultiSignError> {
    let mut keyed = signers
        .into_iter()
        .map(|signer| match decode_classic_address(&signer.account) {
            Ok(id) => Ok((id, signer)),
            Err(_) => Err(MultiSignError::InvalidSignerAddress(signer.account)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, signer)| signer).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SequenceSource, TransactionDraft};
    use crate::ledger::testing::{
        decode_blob, MockOracle, ACCOUNT, SEED_1, SEED_2, SEED_3, SIGNER_1, SIGNER_2, SIGNER_3,
    };
    use std::sync::atomic::Ordering;

    fn unsigned_tx() -> Transaction {
        TransactionDraft::ticket_create(1).build(
            ACCOUNT,
            SequenceSource::Account(5),
            Drops(10),
            1020,
        )
    }

    fn request(addresses: &[&str], seeds: &[&str]) -> MultiSignRequest {
        MultiSignRequest {
            environment: Environment::Testnet,
            tx: unsigned_tx(),
            signer_addresses: addresses.iter().map(|s| s.to_string()).collect(),
            signer_seeds: seeds.iter().map(|s| s.to_string()).collect(),
            fee: Drops(10),
        }
    }

    #[tokio::test]
    async fn test_three_signers_fee_and_order() {
        let coordinator = MultiSignCoordinator::new(Arc::new(MockOracle::new()), CollectionMode::Parallel);

        // SIGNER_3 has the largest account id, SIGNER_1 the smallest
        let result = coordinator
            .collect_signatures(request(
                &[SIGNER_3, SIGNER_1, SIGNER_2],
                &[SEED_3, SEED_1, SEED_2],
            ))
            .await;

        assert!(result.is_complete(), "{:?}", result.errors);
        assert_eq!(result.fee, Drops(40));
        assert_eq!(result.tx.fee, Some(Drops(40)));
        assert_eq!(result.tx.signing_pub_key.as_deref(), Some(""));

        let accounts: Vec<&str> = result.signers.iter().map(|s| s.account.as_str()).collect();
        assert_eq!(accounts, vec![SIGNER_1, SIGNER_2, SIGNER_3]);
        assert_eq!(
            result.signers[0].signing_pub_key,
            MockOracle::public_key_for(SEED_1)
        );

        let submitted = decode_blob(&result.signed_tx.unwrap().tx_blob);
        assert_eq!(submitted.signer_count(), 3);
        assert_eq!(submitted.fee, Some(Drops(40)));
    }

    #[tokio::test]
    async fn test_sequential_matches_parallel() {
        let oracle = Arc::new(MockOracle::new());
        let parallel = MultiSignCoordinator::new(oracle.clone(), CollectionMode::Parallel)
            .collect_signatures(request(&[SIGNER_1, SIGNER_2], &[SEED_1, SEED_2]))
            .await;
        let sequential = MultiSignCoordinator::new(oracle.clone(), CollectionMode::Sequential)
            .collect_signatures(request(&[SIGNER_1, SIGNER_2], &[SEED_1, SEED_2]))
            .await;

        assert_eq!(parallel.signers, sequential.signers);
        assert_eq!(parallel.signed_tx, sequential.signed_tx);
        assert_eq!(oracle.wallet_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_count_mismatch_fails_without_oracle_calls() {
        let oracle = Arc::new(MockOracle::new());
        let coordinator = MultiSignCoordinator::new(oracle.clone(), CollectionMode::Parallel);

        let result = coordinator
            .collect_signatures(request(&[SIGNER_1, SIGNER_2], &[SEED_1]))
            .await;

        assert!(!result.is_complete());
        assert_eq!(
            result.errors,
            vec!["Number of signer addresses must match number of signer seeds".to_string()]
        );
        assert_eq!(oracle.wallet_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unusable_seed_is_named() {
        let coordinator = MultiSignCoordinator::new(
            Arc::new(MockOracle::new().rejecting(SEED_2)),
            CollectionMode::Parallel,
        );

        let result = coordinator
            .collect_signatures(request(&[SIGNER_1, SIGNER_2], &[SEED_1, SEED_2]))
            .await;

        assert!(result.signed_tx.is_none());
        assert!(result.signers.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains(SIGNER_2));
        assert!(result
            .failure_message()
            .starts_with("No valid signature collected for multisign transaction"));
    }

    #[tokio::test]
    async fn test_null_wallet_reported() {
        let coordinator =
            MultiSignCoordinator::new(Arc::new(MockOracle::new()), CollectionMode::Sequential);

        let result = coordinator
            .collect_signatures(request(&[SIGNER_1], &["not-a-seed"]))
            .await;

        assert!(!result.is_complete());
        assert!(result.errors[0].contains("Wallet could not be created or is undefined"));
    }

    #[tokio::test]
    async fn test_single_signing_failure_is_total() {
        let coordinator = MultiSignCoordinator::new(
            Arc::new(MockOracle::new().failing(SEED_1)),
            CollectionMode::Parallel,
        );

        let result = coordinator
            .collect_signatures(request(&[SIGNER_1, SIGNER_2], &[SEED_1, SEED_2]))
            .await;

        assert!(result.signed_tx.is_none());
        assert!(result.signers.is_empty());
        // fee was already applied before signing started
        assert_eq!(result.fee, Drops(30));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" a, b\n c,,d "),
            vec!["a", "b", "c", "d"]
        );
        assert!(split_list(" , ").is_empty());
    }
}
