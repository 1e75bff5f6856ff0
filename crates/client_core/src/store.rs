//! The account store: sole owner and writer of the cached account list.
//!
//! Every mutating call goes to the backend first. The cache is patched only after the
//! backend confirms, and each patch is republished to all [`AccountsView`] handles.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::domain::{Account, AccountDraft, AccountId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{error::TransportError, transport::AccountsApi};

pub struct AccountStore {
    api: Arc<dyn AccountsApi>,
    accounts: watch::Sender<Vec<Account>>,
    refreshes: AtomicU64,
}

impl AccountStore {
    pub fn new(api: Arc<dyn AccountsApi>) -> Self {
        let (accounts, _) = watch::channel(Vec::new());
        Self {
            api,
            accounts,
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> AccountsView {
        AccountsView {
            rx: self.accounts.subscribe(),
        }
    }

    pub fn snapshot(&self) -> Vec<Account> {
        self.accounts.borrow().clone()
    }

    /// Replaces the cache with the backend's list. A response that settles after a newer
    /// refresh has started is dropped and reported as [`TransportError::Cancelled`].
    pub async fn refresh(&self) -> Result<Vec<Account>, TransportError> {
        let generation = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "refreshing account list");
        let accounts = self
            .api
            .list()
            .await
            .map_err(|err| log_failure("refresh", None, err))?;
        if self.refreshes.load(Ordering::SeqCst) != generation {
            debug!(generation, "newer refresh in flight; dropping stale list");
            return Err(TransportError::Cancelled);
        }
        info!(count = accounts.len(), "account list refreshed");
        self.accounts.send_replace(accounts.clone());
        Ok(accounts)
    }

    /// Point lookup; never touches the cache.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Account, TransportError> {
        debug!(account_id = id.0, "fetching account");
        self.api
            .get(id)
            .await
            .map_err(|err| log_failure("get", Some(id), err))
    }

    pub async fn create(&self, draft: AccountDraft) -> Result<Account, TransportError> {
        debug!("creating account");
        let created = self
            .api
            .create(&draft)
            .await
            .map_err(|err| log_failure("create", None, err))?;
        info!(account_id = created.id.0, "account created");
        self.accounts
            .send_modify(|accounts| accounts.push(created.clone()));
        Ok(created)
    }

    pub async fn update(
        &self,
        id: AccountId,
        draft: AccountDraft,
    ) -> Result<Account, TransportError> {
        debug!(account_id = id.0, "updating account");
        let updated = self
            .api
            .update(id, &draft.with_id(id))
            .await
            .map_err(|err| log_failure("update", Some(id), err))?;
        info!(account_id = id.0, "account updated");
        let patched = self.accounts.send_if_modified(|accounts| {
            match accounts.iter_mut().find(|account| account.id == id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        });
        if !patched {
            debug!(account_id = id.0, "updated account is not cached; list left as is");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: AccountId) -> Result<(), TransportError> {
        debug!(account_id = id.0, "deleting account");
        self.api
            .delete(id)
            .await
            .map_err(|err| log_failure("delete", Some(id), err))?;
        info!(account_id = id.0, "account deleted");
        self.accounts
            .send_modify(|accounts| accounts.retain(|account| account.id != id));
        Ok(())
    }
}

fn log_failure(operation: &str, id: Option<AccountId>, err: TransportError) -> TransportError {
    if !err.is_cancellation() {
        warn!(
            operation,
            account_id = id.map(|id| id.0),
            error = %err,
            "account request failed"
        );
    }
    err
}

/// Read-only, continuously updated handle on the store's account list.
#[derive(Debug, Clone)]
pub struct AccountsView {
    rx: watch::Receiver<Vec<Account>>,
}

impl AccountsView {
    pub fn snapshot(&self) -> Vec<Account> {
        self.rx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.rx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.borrow().is_empty()
    }

    pub fn find(&self, id: AccountId) -> Option<Account> {
        self.rx.borrow().iter().find(|account| account.id == id).cloned()
    }

    /// Whether the store republished since this handle last looked.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next republish. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Marks the current list as seen and returns it.
    pub fn mark_seen(&mut self) -> Vec<Account> {
        self.rx.borrow_and_update().clone()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
