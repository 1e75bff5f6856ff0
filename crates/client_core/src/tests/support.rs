//! In-process doubles shared by the controller and store tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use shared::domain::{Account, AccountDraft, AccountId};
use tokio::sync::{mpsc, oneshot};

use crate::{
    error::TransportError, navigation::Route, store::AccountStore, transport::AccountsApi,
};

pub(crate) struct FakeAccountsApi {
    accounts: Mutex<Vec<Account>>,
    next_id: AtomicI64,
    failure: Mutex<Option<TransportError>>,
    calls: AtomicUsize,
}

impl FakeAccountsApi {
    pub(crate) fn new(accounts: Vec<Account>) -> Self {
        let next_id = accounts.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
        Self {
            accounts: Mutex::new(accounts),
            next_id: AtomicI64::new(next_id),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_with(&self, err: TransportError) {
        *self.failure.lock().expect("failure lock") = Some(err);
    }

    pub(crate) fn clear_failure(&self) {
        *self.failure.lock().expect("failure lock") = None;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Changes a record behind the store's back, as another client would.
    pub(crate) fn replace_remote(&self, account: Account) {
        let mut accounts = self.accounts.lock().expect("accounts lock");
        if let Some(slot) = accounts.iter_mut().find(|a| a.id == account.id) {
            *slot = account;
        }
    }

    fn begin_call(&self) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().expect("failure lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> TransportError {
        TransportError::Status {
            status: 404,
            message: Some("Account not found".into()),
        }
    }
}

#[async_trait]
impl AccountsApi for FakeAccountsApi {
    async fn list(&self) -> Result<Vec<Account>, TransportError> {
        self.begin_call()?;
        Ok(self.accounts.lock().expect("accounts lock").clone())
    }

    async fn get(&self, id: AccountId) -> Result<Account, TransportError> {
        self.begin_call()?;
        self.accounts
            .lock()
            .expect("accounts lock")
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, draft: &AccountDraft) -> Result<Account, TransportError> {
        self.begin_call()?;
        let id = AccountId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let account = draft.clone().with_id(id);
        self.accounts
            .lock()
            .expect("accounts lock")
            .push(account.clone());
        Ok(account)
    }

    async fn update(&self, id: AccountId, account: &Account) -> Result<Account, TransportError> {
        self.begin_call()?;
        let mut accounts = self.accounts.lock().expect("accounts lock");
        let slot = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(Self::not_found)?;
        *slot = account.clone();
        slot.id = id;
        Ok(slot.clone())
    }

    async fn delete(&self, id: AccountId) -> Result<(), TransportError> {
        self.begin_call()?;
        let mut accounts = self.accounts.lock().expect("accounts lock");
        let before = accounts.len();
        accounts.retain(|a| a.id != id);
        if accounts.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// Answers each `list` call only when the test releases its gate, in call order.
/// Every other operation fails.
pub(crate) struct GatedListApi {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<Account>>>>,
    calls: AtomicUsize,
}

impl GatedListApi {
    pub(crate) fn new(count: usize) -> (Arc<Self>, Vec<oneshot::Sender<Vec<Account>>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..count).map(|_| oneshot::channel()).unzip();
        let api = Arc::new(Self {
            gates: Mutex::new(receivers),
            calls: AtomicUsize::new(0),
        });
        (api, senders)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unsupported() -> TransportError {
        TransportError::Unreachable("gated api only lists".into())
    }
}

#[async_trait]
impl AccountsApi for GatedListApi {
    async fn list(&self) -> Result<Vec<Account>, TransportError> {
        let gate = self.gates.lock().expect("gates lock").pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(gate) => gate
                .await
                .map_err(|_| TransportError::Unreachable("gate dropped".into())),
            None => Err(Self::unsupported()),
        }
    }

    async fn get(&self, _id: AccountId) -> Result<Account, TransportError> {
        Err(Self::unsupported())
    }

    async fn create(&self, _draft: &AccountDraft) -> Result<Account, TransportError> {
        Err(Self::unsupported())
    }

    async fn update(&self, _id: AccountId, _account: &Account) -> Result<Account, TransportError> {
        Err(Self::unsupported())
    }

    async fn delete(&self, _id: AccountId) -> Result<(), TransportError> {
        Err(Self::unsupported())
    }
}

/// Yields until `calls` reports at least `count` requests in flight.
pub(crate) async fn wait_for_calls(calls: impl Fn() -> usize, count: usize) {
    while calls() < count {
        tokio::task::yield_now().await;
    }
}

pub(crate) fn account(id: i64, holder: &str, number: &str, balance: f64) -> Account {
    AccountDraft::new(holder, number, balance).with_id(AccountId(id))
}

pub(crate) fn sample_accounts() -> Vec<Account> {
    vec![
        account(1, "Alice Smith", "1000000001", 150.0),
        account(2, "Bob Jones", "1000000002", 0.0),
        account(3, "Carol White", "100000000003", 98765.5),
    ]
}

pub(crate) fn store_with(accounts: Vec<Account>) -> (Arc<AccountStore>, Arc<FakeAccountsApi>) {
    let api = Arc::new(FakeAccountsApi::new(accounts));
    let store = Arc::new(AccountStore::new(api.clone()));
    (store, api)
}

pub(crate) fn route_channel() -> (mpsc::UnboundedSender<Route>, mpsc::UnboundedReceiver<Route>) {
    mpsc::unbounded_channel()
}
