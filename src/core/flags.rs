//! Account flags
//!
//! [`AccountFlag`] names the `AccountSet` flags a user can toggle; a
//! [`FlagConfig`] collects the requested changes as plain data.
//! [`AccountRootFlags`] decodes the flags word of an on-ledger account.

use crate::core::transaction::{TransactionDraft, TransactionType};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// `AccountSet` flags (`asf*` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountFlag {
    RequireDest,
    RequireAuth,
    DisallowXrp,
    DisableMaster,
    AccountTxnId,
    NoFreeze,
    GlobalFreeze,
    DefaultRipple,
    DepositAuth,
    AuthorizedNfTokenMinter,
    DisallowIncomingNfTokenOffer,
    DisallowIncomingCheck,
    DisallowIncomingPayChan,
    DisallowIncomingTrustline,
    AllowTrustLineClawback,
}

impl AccountFlag {
    /// Numeric value used in `SetFlag` / `ClearFlag`
    pub fn value(&self) -> u32 {
        match self {
            AccountFlag::RequireDest => 1,
            AccountFlag::RequireAuth => 2,
            AccountFlag::DisallowXrp => 3,
            AccountFlag::DisableMaster => 4,
            AccountFlag::AccountTxnId => 5,
            AccountFlag::NoFreeze => 6,
            AccountFlag::GlobalFreeze => 7,
            AccountFlag::DefaultRipple => 8,
            AccountFlag::DepositAuth => 9,
            AccountFlag::AuthorizedNfTokenMinter => 10,
            AccountFlag::DisallowIncomingNfTokenOffer => 12,
            AccountFlag::DisallowIncomingCheck => 13,
            AccountFlag::DisallowIncomingPayChan => 14,
            AccountFlag::DisallowIncomingTrustline => 15,
            AccountFlag::AllowTrustLineClawback => 16,
        }
    }
}

impl fmt::Display for AccountFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Requested flag changes for one `updateFlags` action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagConfig {
    #[serde(default)]
    pub set: BTreeSet<AccountFlag>,
    #[serde(default)]
    pub clear: BTreeSet<AccountFlag>,
}

impl FlagConfig {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.clear.is_empty()
    }

    pub fn sets(&self, flag: AccountFlag) -> bool {
        self.set.contains(&flag)
    }

    /// Flags that are both set and cleared in this request
    pub fn contradictions(&self) -> Vec<AccountFlag> {
        self.set.intersection(&self.clear).copied().collect()
    }

    /// One `AccountSet` draft per flag change, sets before clears
    pub fn account_set_drafts(&self) -> Vec<TransactionDraft> {
        let sets = self.set.iter().map(|flag| {
            TransactionDraft::new(TransactionType::AccountSet).field("SetFlag", flag.value())
        });
        let clears = self.clear.iter().map(|flag| {
            TransactionDraft::new(TransactionType::AccountSet).field("ClearFlag", flag.value())
        });
        sets.chain(clears).collect()
    }
}

bitflags! {
    /// `lsf*` flags of an `AccountRoot` ledger entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AccountRootFlags: u32 {
        const PASSWORD_SPENT = 0x0001_0000;
        const REQUIRE_DEST_TAG = 0x0002_0000;
        const REQUIRE_AUTH = 0x0004_0000;
        const DISALLOW_XRP = 0x0008_0000;
        const DISABLE_MASTER = 0x0010_0000;
        const NO_FREEZE = 0x0020_0000;
        const GLOBAL_FREEZE = 0x0040_0000;
        const DEFAULT_RIPPLE = 0x0080_0000;
        const DEPOSIT_AUTH = 0x0100_0000;
        const DISALLOW_INCOMING_NFTOKEN_OFFER = 0x0400_0000;
        const DISALLOW_INCOMING_CHECK = 0x0800_0000;
        const DISALLOW_INCOMING_PAY_CHAN = 0x1000_0000;
        const DISALLOW_INCOMING_TRUSTLINE = 0x2000_0000;
        const ALLOW_TRUSTLINE_CLAWBACK = 0x8000_0000;
    }
}

impl AccountRootFlags {
    pub fn master_disabled(&self) -> bool {
        self.contains(AccountRootFlags::DISABLE_MASTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_set_drafts() {
        let config = FlagConfig {
            set: [AccountFlag::RequireDest, AccountFlag::DepositAuth]
                .into_iter()
                .collect(),
            clear: [AccountFlag::DefaultRipple].into_iter().collect(),
        };

        let drafts = config.account_set_drafts();
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].fields["SetFlag"], 1);
        assert_eq!(drafts[1].fields["SetFlag"], 9);
        assert_eq!(drafts[2].fields["ClearFlag"], 8);
    }

    #[test]
    fn test_contradictions() {
        let config = FlagConfig {
            set: [AccountFlag::NoFreeze].into_iter().collect(),
            clear: [AccountFlag::NoFreeze].into_iter().collect(),
        };
        assert_eq!(config.contradictions(), vec![AccountFlag::NoFreeze]);
        assert!(FlagConfig::default().is_empty());
    }

    #[test]
    fn test_config_from_json() {
        let config: FlagConfig =
            serde_json::from_str(r#"{"set":["NoFreeze","GlobalFreeze"]}"#).unwrap();
        assert!(config.sets(AccountFlag::NoFreeze));
        assert!(config.sets(AccountFlag::GlobalFreeze));
        assert!(config.clear.is_empty());
    }

    #[test]
    fn test_root_flags() {
        let flags = AccountRootFlags::from_bits_truncate(0x0010_0000 | 0x0002_0000);
        assert!(flags.master_disabled());
        assert!(flags.contains(AccountRootFlags::REQUIRE_DEST_TAG));
        assert!(!AccountRootFlags::empty().master_disabled());
    }
}
