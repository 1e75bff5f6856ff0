//! List controller: renders the store's live view, refreshes on activation and
//! deletes rows after confirmation.

use std::sync::Arc;

use shared::domain::{Account, AccountId};
use tracing::debug;

use crate::{
    currency::format_currency,
    error::TransportError,
    interest::{ActivationTracker, InterestToken},
    navigation::{Navigator, Route},
    store::{AccountStore, AccountsView},
    surface::{user_message, FailureContext},
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this account?";

/// Asks the user to confirm a destructive action.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRow {
    pub id: AccountId,
    pub account_holder_name: String,
    pub account_number: String,
    pub balance: f64,
    pub balance_display: String,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            account_holder_name: account.account_holder_name.clone(),
            account_number: account.account_number.clone(),
            balance: account.balance,
            balance_display: format_currency(account.balance),
        }
    }
}

pub struct AccountList {
    store: Arc<AccountStore>,
    navigator: Arc<dyn Navigator>,
    view: AccountsView,
    tracker: ActivationTracker,
    interest: InterestToken,
    loading: bool,
    error: Option<String>,
}

impl AccountList {
    pub fn new(store: Arc<AccountStore>, navigator: Arc<dyn Navigator>) -> Self {
        let tracker = ActivationTracker::new();
        let interest = tracker.activate();
        let view = store.view();
        Self {
            store,
            navigator,
            view,
            tracker,
            interest,
            loading: false,
            error: None,
        }
    }

    pub fn view(&self) -> &AccountsView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> Vec<AccountRow> {
        self.view.snapshot().iter().map(AccountRow::from).collect()
    }

    pub fn begin_activation(&mut self) -> RefreshTicket {
        self.interest = self.tracker.activate();
        self.loading = true;
        self.error = None;
        RefreshTicket {
            store: Arc::clone(&self.store),
            token: self.interest.clone(),
        }
    }

    pub fn finish_refresh(&mut self, outcome: RefreshOutcome) {
        if !outcome.token.is_current() {
            return;
        }
        self.loading = false;
        if let Err(err) = outcome.result {
            self.error = user_message(FailureContext::LoadAccounts, &err);
        }
    }

    pub async fn activate(&mut self) {
        let ticket = self.begin_activation();
        let outcome = ticket.run().await;
        self.finish_refresh(outcome);
    }

    /// Deletes after the user confirms. Declining makes no backend call.
    /// Returns whether the account was deleted.
    pub async fn delete(&mut self, id: AccountId, confirmation: &dyn Confirmation) -> bool {
        if !confirmation.confirm(DELETE_PROMPT) {
            debug!(account_id = id.0, "delete declined");
            return false;
        }

        let token = self.interest.clone();
        match token.guard(self.store.delete(id)).await {
            Ok(()) => true,
            Err(err) => {
                if token.is_current() {
                    self.error = user_message(FailureContext::DeleteAccount, &err);
                }
                false
            }
        }
    }

    pub fn edit(&self, id: AccountId) {
        self.navigator.navigate(Route::EditAccount(id));
    }

    pub fn create_new(&self) {
        self.navigator.navigate(Route::NewAccount);
    }

    pub fn deactivate(&mut self) {
        self.tracker.deactivate();
        self.loading = false;
    }
}

pub struct RefreshTicket {
    store: Arc<AccountStore>,
    token: InterestToken,
}

impl RefreshTicket {
    pub async fn run(self) -> RefreshOutcome {
        let result = self.token.guard(self.store.refresh()).await.map(|_| ());
        RefreshOutcome {
            token: self.token,
            result,
        }
    }
}

pub struct RefreshOutcome {
    token: InterestToken,
    result: Result<(), TransportError>,
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
