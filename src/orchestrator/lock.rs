//! Per-account serialisation
//!
//! Two actions on the same account would race for its sequence number, so
//! each account gets one async mutex. Different accounts never wait on
//! each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `account`
    pub async fn acquire(&self, account: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = match self.locks.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            Arc::clone(
                locks
                    .entry(account.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        lock.lock_owned().await
    }

    /// Number of accounts seen so far
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_account_waits() {
        let locks = Arc::new(AccountLocks::new());
        let guard = locks.acquire("rA").await;

        let waiting = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("rA").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_accounts_independent() {
        let locks = AccountLocks::new();
        let _a = locks.acquire("rA").await;
        let _b = locks.acquire("rB").await;
        assert_eq!(locks.len(), 2);
    }
}
