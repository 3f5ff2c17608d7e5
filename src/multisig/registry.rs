//! Signer registry
//!
//! Persists signer entries per account and reconciles them with the signer
//! list the ledger actually holds. Regular key material is stored alongside.

use crate::ledger::{
    LedgerClient, LedgerError, LedgerObject, LedgerObjectType, LedgerSelector, LedgerSignerEntry,
};
use crate::multisig::signer::{default_entries, SignerEntry};
use crate::storage::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Key suffix of a persisted signer list
pub const SIGNER_ENTRIES_SUFFIX: &str = "signerEntries";
/// Key suffix of a persisted regular key address
pub const REGULAR_KEY_SUFFIX: &str = "regularKey";
/// Key suffix of a persisted regular key seed
pub const REGULAR_KEY_SEED_SUFFIX: &str = "regularKeySeed";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Signer list as observed on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerListSummary {
    pub entries: Vec<LedgerSignerEntry>,
    pub quorum: u32,
}

impl SignerListSummary {
    /// `account~weight` pairs
    pub fn pairs(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{}~{}", e.account, e.signer_weight))
            .collect()
    }
}

impl fmt::Display for SignerListSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (quorum {})", self.pairs().join(", "), self.quorum)
    }
}

/// Signer configuration after reconciling cache and ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerState {
    pub entries: Vec<SignerEntry>,
    pub quorum: u32,
    pub on_ledger: Option<SignerListSummary>,
}

impl SignerState {
    pub fn multi_sign_configured(&self) -> bool {
        self.on_ledger.is_some()
    }
}

/// Regular key address and seed kept for an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularKey {
    pub address: String,
    pub seed: Option<String>,
}

pub struct SignerRegistry<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> SignerRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn key(address: &str, suffix: &str) -> String {
        format!("{}{}", address, suffix)
    }

    /// Persisted entries for `address`, or the default single blank entry
    pub fn load(&self, address: &str) -> Result<Vec<SignerEntry>, RegistryError> {
        let stored: Option<Vec<SignerEntry>> =
            self.store.get_as(&Self::key(address, SIGNER_ENTRIES_SUFFIX))?;

        match stored {
            Some(entries) if !entries.is_empty() => Ok(entries),
            _ => Ok(self.clear()),
        }
    }

    pub fn save(&self, address: &str, entries: &[SignerEntry]) -> Result<(), RegistryError> {
        self.store
            .set_as(&Self::key(address, SIGNER_ENTRIES_SUFFIX), &entries)?;
        log::debug!("Saved {} signer entries for {}", entries.len(), address);
        Ok(())
    }

    /// The canonical empty state
    pub fn clear(&self) -> Vec<SignerEntry> {
        default_entries()
    }

    /// Drop the persisted entries for `address`
    pub fn remove(&self, address: &str) -> Result<(), RegistryError> {
        self.store
            .remove_value(&Self::key(address, SIGNER_ENTRIES_SUFFIX))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Regular key material
    // -------------------------------------------------------------------------

    pub fn save_regular_key(
        &self,
        address: &str,
        regular_key: &str,
        seed: Option<&str>,
    ) -> Result<(), RegistryError> {
        self.store
            .set_as(&Self::key(address, REGULAR_KEY_SUFFIX), &regular_key)?;
        match seed {
            Some(seed) => self
                .store
                .set_as(&Self::key(address, REGULAR_KEY_SEED_SUFFIX), &seed)?,
            None => self
                .store
                .remove_value(&Self::key(address, REGULAR_KEY_SEED_SUFFIX))?,
        }
        Ok(())
    }

    pub fn load_regular_key(&self, address: &str) -> Result<Option<RegularKey>, RegistryError> {
        let key: Option<String> = self.store.get_as(&Self::key(address, REGULAR_KEY_SUFFIX))?;
        let seed: Option<String> = self
            .store
            .get_as(&Self::key(address, REGULAR_KEY_SEED_SUFFIX))?;

        Ok(key
            .filter(|k| !k.trim().is_empty())
            .map(|address| RegularKey { address, seed }))
    }

    pub fn clear_regular_key(&self, address: &str) -> Result<(), RegistryError> {
        self.store
            .remove_value(&Self::key(address, REGULAR_KEY_SUFFIX))?;
        self.store
            .remove_value(&Self::key(address, REGULAR_KEY_SEED_SUFFIX))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Ledger reconciliation
    // -------------------------------------------------------------------------

    /// Extract the signer list from `account_objects` output
    pub fn summarize(objects: &[LedgerObject]) -> Option<SignerListSummary> {
        objects.iter().find_map(|object| match object {
            LedgerObject::SignerList(list) => Some(SignerListSummary {
                entries: list
                    .signer_entries
                    .iter()
                    .map(|item| item.signer_entry.clone())
                    .collect(),
                quorum: list.signer_quorum,
            }),
            _ => None,
        })
    }

    /// Align the cached entries of `address` with the ledger
    ///
    /// Without an on-ledger signer list the cache is deleted and the quorum
    /// drops to 0. With one, the ledger quorum wins; cached entries are kept
    /// because they carry seeds, and an empty cache is seeded from the
    /// ledger's accounts and weights.
    pub fn reconcile(
        &self,
        address: &str,
        objects: &[LedgerObject],
    ) -> Result<SignerState, RegistryError> {
        let Some(summary) = Self::summarize(objects) else {
            self.remove(address)?;
            log::info!("No signer list on ledger for {}, cleared cache", address);
            return Ok(SignerState {
                entries: self.clear(),
                quorum: 0,
                on_ledger: None,
            });
        };

        let cached = self.load(address)?;
        let entries = if cached == self.clear() {
            summary
                .entries
                .iter()
                .map(|e| SignerEntry::new(&e.account, "", e.signer_weight))
                .collect()
        } else {
            cached
        };

        Ok(SignerState {
            entries,
            quorum: summary.quorum,
            on_ledger: Some(summary),
        })
    }

    /// Fetch the account's signer list and reconcile
    pub async fn refresh<C: LedgerClient + ?Sized>(
        &self,
        client: &C,
        address: &str,
    ) -> Result<SignerState, RegistryError> {
        let objects = client
            .account_objects(
                address,
                LedgerSelector::Validated,
                Some(LedgerObjectType::SignerList),
            )
            .await?;
        self.reconcile(address, &objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::testing::{MockLedger, ACCOUNT, SEED_1, SEED_2, SIGNER_1, SIGNER_2};
    use crate::ledger::{LedgerSignerEntryItem, SignerListObject};
    use crate::storage::MemoryStore;

    fn registry() -> (SignerRegistry<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (SignerRegistry::new(store.clone()), store)
    }

    fn signer_list(quorum: u32) -> LedgerObject {
        LedgerObject::SignerList(SignerListObject {
            signer_entries: vec![
                LedgerSignerEntryItem {
                    signer_entry: LedgerSignerEntry {
                        account: SIGNER_1.to_string(),
                        signer_weight: 2,
                    },
                },
                LedgerSignerEntryItem {
                    signer_entry: LedgerSignerEntry {
                        account: SIGNER_2.to_string(),
                        signer_weight: 3,
                    },
                },
            ],
            signer_quorum: quorum,
        })
    }

    #[test]
    fn test_round_trip() {
        let (registry, store) = registry();
        let entries = vec![
            SignerEntry::new(SIGNER_1, SEED_1, 2),
            SignerEntry::new(SIGNER_2, SEED_2, 3),
        ];

        registry.save(ACCOUNT, &entries).unwrap();
        assert_eq!(registry.load(ACCOUNT).unwrap(), entries);
        assert!(store
            .get(&format!("{}signerEntries", ACCOUNT))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_unknown_address_loads_default() {
        let (registry, _) = registry();
        assert_eq!(registry.load(SIGNER_1).unwrap(), registry.clear());

        registry.save(SIGNER_1, &[]).unwrap();
        assert_eq!(registry.load(SIGNER_1).unwrap(), registry.clear());
    }

    #[test]
    fn test_summary_pairs() {
        let summary = SignerRegistry::<MemoryStore>::summarize(&[
            LedgerObject::Other,
            signer_list(4),
        ])
        .unwrap();

        assert_eq!(
            summary.pairs(),
            vec![format!("{}~2", SIGNER_1), format!("{}~3", SIGNER_2)]
        );
        assert_eq!(summary.quorum, 4);
        assert!(SignerRegistry::<MemoryStore>::summarize(&[]).is_none());
    }

    #[test]
    fn test_reconcile_without_ledger_list_clears_cache() {
        let (registry, _) = registry();
        registry
            .save(ACCOUNT, &[SignerEntry::new(SIGNER_1, SEED_1, 1)])
            .unwrap();

        let state = registry.reconcile(ACCOUNT, &[]).unwrap();
        assert_eq!(state.quorum, 0);
        assert!(!state.multi_sign_configured());
        assert_eq!(state.entries, registry.clear());
        assert_eq!(registry.load(ACCOUNT).unwrap(), registry.clear());
    }

    #[test]
    fn test_reconcile_keeps_cached_seeds() {
        let (registry, _) = registry();
        let cached = vec![
            SignerEntry::new(SIGNER_1, SEED_1, 2),
            SignerEntry::new(SIGNER_2, SEED_2, 3),
        ];
        registry.save(ACCOUNT, &cached).unwrap();

        let state = registry.reconcile(ACCOUNT, &[signer_list(5)]).unwrap();
        assert_eq!(state.entries, cached);
        assert_eq!(state.quorum, 5);
        assert!(state.multi_sign_configured());
    }

    #[test]
    fn test_reconcile_seeds_empty_cache_from_ledger() {
        let (registry, _) = registry();
        let state = registry.reconcile(ACCOUNT, &[signer_list(3)]).unwrap();

        assert_eq!(
            state.entries,
            vec![
                SignerEntry::new(SIGNER_1, "", 2),
                SignerEntry::new(SIGNER_2, "", 3),
            ]
        );
    }

    #[test]
    fn test_regular_key_material() {
        let (registry, store) = registry();
        assert!(registry.load_regular_key(ACCOUNT).unwrap().is_none());

        registry
            .save_regular_key(ACCOUNT, SIGNER_1, Some(SEED_1))
            .unwrap();
        assert_eq!(
            registry.load_regular_key(ACCOUNT).unwrap(),
            Some(RegularKey {
                address: SIGNER_1.to_string(),
                seed: Some(SEED_1.to_string()),
            })
        );
        assert!(store
            .get(&format!("{}regularKeySeed", ACCOUNT))
            .unwrap()
            .is_some());

        registry.clear_regular_key(ACCOUNT).unwrap();
        assert!(registry.load_regular_key(ACCOUNT).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_from_ledger() {
        let (registry, _) = registry();
        let ledger = MockLedger::new().with_objects(ACCOUNT, vec![signer_list(2)]);

        let state = registry.refresh(&ledger, ACCOUNT).await.unwrap();
        assert_eq!(state.quorum, 2);
        assert_eq!(state.on_ledger.unwrap().entries.len(), 2);
    }
}
