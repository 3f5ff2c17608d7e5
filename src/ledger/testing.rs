//! In-memory ledger client and signing oracle for tests

use crate::core::{Drops, SignedTransaction, Transaction};
use crate::crypto::{is_valid_seed, sha256};
use crate::ledger::client::{LedgerClient, LedgerError};
use crate::ledger::oracle::{Credential, OracleError, SigningOracle};
use crate::ledger::types::{
    AccountInfo, Environment, LedgerObject, LedgerObjectType, LedgerSelector, SubmitResponse,
    TransactionMeta, SUCCESS_CODE,
};
use async_trait::async_trait;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Signer and wallet fixtures (valid addresses and family seeds)
pub const ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
pub const ACCOUNT_SEED: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
pub const SIGNER_1: &str = "raJ1Aqkhf19P7cyUc33MMVAzgvHPvtNFC";
pub const SIGNER_2: &str = "rBcktgVfNjHmxNAQDEE66ztz4qZkdngdm";
pub const SIGNER_3: &str = "rGvdqXNwMbSwRiubF4PhhVqzhkiaTDPgU";
pub const SEED_1: &str = "sp5fV4UGhZhfCvcDRuY3dyyh5PjHf";
pub const SEED_2: &str = "sp5vYGGekvDhXJSn6f7oPdcjheQXW";
pub const SEED_3: &str = "spjjbwMsTH4r4gEAxKR79HGMooipq";
pub const REGULAR_KEY_SEED: &str = "spkYehRS9eWxNhnFDX43tvvpKwLY2";

/// Decode a blob produced by [`MockOracle`]
pub fn decode_blob(blob: &str) -> Transaction {
    let bytes = hex::decode(blob).expect("mock blob is hex");
    serde_json::from_slice(&bytes).expect("mock blob is transaction json")
}

fn encode(tx: &Transaction) -> SignedTransaction {
    let bytes = serde_json::to_vec(tx).expect("transaction serializes");
    SignedTransaction {
        tx_blob: hex::encode_upper(&bytes),
        hash: hex::encode_upper(sha256(&bytes)),
    }
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Default)]
pub struct MockLedger {
    accounts: Mutex<HashMap<String, AccountInfo>>,
    objects: Mutex<HashMap<String, Vec<LedgerObject>>>,
    result_code: Mutex<Option<String>>,
    submit_error: Mutex<Option<LedgerError>>,
    submitted: Mutex<Vec<String>>,
    pub base_fee: Drops,
    pub ledger_index: u32,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            base_fee: Drops(10),
            ledger_index: 1000,
            ..Default::default()
        }
    }

    pub fn with_account(self, address: &str, balance: u64, sequence: u32, flags: u32) -> Self {
        self.accounts.lock().unwrap().insert(
            address.to_string(),
            AccountInfo {
                account: address.to_string(),
                balance: Drops(balance),
                sequence,
                flags,
                regular_key: None,
                owner_count: 0,
            },
        );
        self
    }

    pub fn with_objects(self, address: &str, objects: Vec<LedgerObject>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(address.to_string(), objects);
        self
    }

    pub fn with_result(self, code: &str) -> Self {
        *self.result_code.lock().unwrap() = Some(code.to_string());
        self
    }

    pub fn with_submit_error(self, error: LedgerError) -> Self {
        *self.submit_error.lock().unwrap() = Some(error);
        self
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn account_info(
        &self,
        address: &str,
        _ledger: LedgerSelector,
    ) -> Result<AccountInfo, LedgerError> {
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(address.to_string()))
    }

    async fn account_objects(
        &self,
        address: &str,
        _ledger: LedgerSelector,
        filter: Option<LedgerObjectType>,
    ) -> Result<Vec<LedgerObject>, LedgerError> {
        let objects = self
            .objects
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default();

        Ok(objects
            .into_iter()
            .filter(|o| filter.is_none() || o.object_type() == filter)
            .collect())
    }

    async fn calculate_transaction_fee(&self) -> Result<Drops, LedgerError> {
        Ok(self.base_fee)
    }

    async fn last_ledger_index(&self) -> Result<u32, LedgerError> {
        Ok(self.ledger_index)
    }

    async fn submit_and_wait(&self, tx_blob: &str) -> Result<SubmitResponse, LedgerError> {
        if let Some(error) = self.submit_error.lock().unwrap().clone() {
            return Err(error);
        }

        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(tx_blob.to_string());

        let code = self
            .result_code
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| SUCCESS_CODE.to_string());
        let hash = format!("HASH{}", submitted.len());

        Ok(SubmitResponse {
            hash: hash.clone(),
            validated: true,
            meta: Some(TransactionMeta {
                transaction_result: code.clone(),
            }),
            raw: json!({ "hash": hash, "meta": { "TransactionResult": code } }),
        })
    }
}

// =============================================================================
// Oracle
// =============================================================================

pub struct MockCredential {
    public_key: String,
    fail_signing: bool,
}

impl MockCredential {
    pub fn from_seed(seed: &str, fail_signing: bool) -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&sha256(seed.as_bytes())).expect("valid scalar");
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self {
            public_key: hex::encode_upper(public.serialize()),
            fail_signing,
        }
    }
}

#[async_trait]
impl Credential for MockCredential {
    fn public_key(&self) -> &str {
        &self.public_key
    }

    async fn sign(&self, tx: &Transaction) -> Result<SignedTransaction, OracleError> {
        if self.fail_signing {
            return Err(OracleError::SigningFailed("mock failure".to_string()));
        }
        let mut signed = tx.clone();
        signed.signing_pub_key = Some(self.public_key.clone());
        signed.fields.insert(
            "TxnSignature".to_string(),
            Value::String(hex::encode_upper(sha256(self.public_key.as_bytes()))),
        );
        Ok(encode(&signed))
    }

    async fn sign_as_signer(
        &self,
        tx: &Transaction,
        signer_account: &str,
    ) -> Result<String, OracleError> {
        if self.fail_signing {
            return Err(OracleError::SigningFailed("mock failure".to_string()));
        }
        let mut data = serde_json::to_vec(tx).map_err(|e| OracleError::Encoding(e.to_string()))?;
        data.extend_from_slice(signer_account.as_bytes());
        data.extend_from_slice(self.public_key.as_bytes());
        Ok(hex::encode_upper(sha256(&data)))
    }
}

#[derive(Default)]
pub struct MockOracle {
    /// Seeds whose derivation raises an error
    pub rejected_seeds: HashSet<String>,
    /// Seeds whose credential fails to sign
    pub failing_seeds: HashSet<String>,
    /// Seeds for which no wallet can be created
    pub unavailable_seeds: HashSet<String>,
    pub wallet_calls: AtomicUsize,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, seed: &str) -> Self {
        self.rejected_seeds.insert(seed.to_string());
        self
    }

    pub fn failing(mut self, seed: &str) -> Self {
        self.failing_seeds.insert(seed.to_string());
        self
    }

    pub fn unavailable(mut self, seed: &str) -> Self {
        self.unavailable_seeds.insert(seed.to_string());
        self
    }

    pub fn public_key_for(seed: &str) -> String {
        MockCredential::from_seed(seed, false).public_key
    }
}

#[async_trait]
impl SigningOracle for MockOracle {
    async fn wallet(
        &self,
        seed: &str,
        _environment: Environment,
    ) -> Result<Option<Box<dyn Credential>>, OracleError> {
        self.wallet_calls.fetch_add(1, Ordering::SeqCst);

        if self.rejected_seeds.contains(seed) {
            return Err(OracleError::InvalidSeed("unsupported seed encoding".to_string()));
        }
        if !is_valid_seed(seed) || self.unavailable_seeds.contains(seed) {
            return Ok(None);
        }
        let fail = self.failing_seeds.contains(seed);
        Ok(Some(Box::new(MockCredential::from_seed(seed, fail))))
    }

    async fn encode_multisigned(&self, tx: &Transaction) -> Result<SignedTransaction, OracleError> {
        Ok(encode(tx))
    }
}
