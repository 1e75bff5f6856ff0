//! Create/edit form controller for a single account.
//!
//! Async work is split into `begin_*` (synchronous state change, returns a ticket),
//! `Ticket::run` (the backend call, no borrow of the form) and `finish_*` (applies the
//! outcome if its interest token is still current). `activate` and `submit` chain the
//! three steps for callers that do not need to interleave them.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use shared::domain::{Account, AccountDraft, AccountId};
use tracing::{debug, info};

use crate::{
    error::TransportError,
    interest::{ActivationTracker, InterestToken},
    navigation::{Navigator, Route},
    store::AccountStore,
    surface::{user_message, FailureContext},
};

pub const HOLDER_NAME_MIN_LEN: usize = 2;
pub const MIN_BALANCE: f64 = 0.0;
const DEFAULT_BALANCE: &str = "0";

fn account_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10,12}$").expect("account number pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(AccountId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    AccountHolderName,
    AccountNumber,
    Balance,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::AccountHolderName, Field::AccountNumber, Field::Balance];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::AccountHolderName => "Account Holder Name",
            Self::AccountNumber => "Account Number",
            Self::Balance => "Balance",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::AccountHolderName => 0,
            Self::AccountNumber => 1,
            Self::Balance => 2,
        }
    }

    /// First failing rule for `raw`, checked as required, min-length, pattern, minimum.
    pub fn validate(self, raw: &str) -> Option<FieldError> {
        if raw.is_empty() {
            return Some(FieldError::Required);
        }
        match self {
            Self::AccountHolderName => {
                let len = raw.chars().count();
                (len < HOLDER_NAME_MIN_LEN).then_some(FieldError::MinLength {
                    required: HOLDER_NAME_MIN_LEN,
                })
            }
            Self::AccountNumber => {
                (!account_number_pattern().is_match(raw)).then_some(FieldError::Pattern)
            }
            Self::Balance => match parse_balance(raw) {
                None => Some(FieldError::Required),
                Some(value) if value < MIN_BALANCE => Some(FieldError::Min { min: MIN_BALANCE }),
                Some(_) => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldError {
    Required,
    MinLength { required: usize },
    Pattern,
    Min { min: f64 },
}

impl FieldError {
    pub fn message(&self, field: Field) -> String {
        let name = field.display_name();
        match self {
            Self::Required => format!("{name} is required."),
            Self::MinLength { required } => {
                format!("{name} must be at least {required} characters.")
            }
            Self::Pattern => format!("{name} must be a valid account number (10-12 digits)."),
            Self::Min { min } => format!("{name} must be {min} or greater."),
        }
    }
}

fn parse_balance(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(Debug, Clone, Default)]
struct FormField {
    value: String,
    touched: bool,
}

pub struct AccountForm {
    store: Arc<AccountStore>,
    navigator: Arc<dyn Navigator>,
    tracker: ActivationTracker,
    interest: InterestToken,
    mode: FormMode,
    fields: [FormField; 3],
    loading: bool,
    error: Option<String>,
}

impl AccountForm {
    pub fn new(store: Arc<AccountStore>, navigator: Arc<dyn Navigator>) -> Self {
        let tracker = ActivationTracker::new();
        let interest = tracker.activate();
        let mut form = Self {
            store,
            navigator,
            tracker,
            interest,
            mode: FormMode::Create,
            fields: Default::default(),
            loading: false,
            error: None,
        };
        form.reset_fields();
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn value(&self, field: Field) -> &str {
        &self.fields[field.index()].value
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.fields[field.index()].touched
    }

    /// Records user input for a field and marks it touched.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        let slot = &mut self.fields[field.index()];
        slot.value = value.into();
        slot.touched = true;
    }

    pub fn field_error(&self, field: Field) -> Option<FieldError> {
        field.validate(self.value(field))
    }

    /// Error text for a field, shown only once the field has been touched.
    pub fn field_error_message(&self, field: Field) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        self.field_error(field).map(|err| err.message(field))
    }

    pub fn visible_errors(&self) -> Vec<(Field, String)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.field_error_message(field).map(|msg| (field, msg)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        Field::ALL
            .into_iter()
            .all(|field| self.field_error(field).is_none())
    }

    pub fn begin_activation(&mut self, route_id: Option<AccountId>) -> Option<LoadTicket> {
        self.interest = self.tracker.activate();
        self.error = None;
        self.reset_fields();

        match route_id {
            Some(id) => {
                debug!(account_id = id.0, "form activated in edit mode");
                self.mode = FormMode::Edit(id);
                self.loading = true;
                Some(LoadTicket {
                    store: Arc::clone(&self.store),
                    token: self.interest.clone(),
                    id,
                })
            }
            None => {
                debug!("form activated in create mode");
                self.mode = FormMode::Create;
                self.loading = false;
                None
            }
        }
    }

    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        if !outcome.token.is_current() {
            return;
        }
        self.loading = false;
        match outcome.result {
            Ok(account) => self.populate(&account),
            Err(err) => self.error = user_message(FailureContext::LoadAccount, &err),
        }
    }

    pub async fn activate(&mut self, route_id: Option<AccountId>) {
        if let Some(ticket) = self.begin_activation(route_id) {
            let outcome = ticket.run().await;
            self.finish_load(outcome);
        }
    }

    /// Returns `None` when the form is busy or invalid; invalid forms get every field
    /// marked touched so their errors become visible.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if self.loading {
            return None;
        }
        if !self.is_valid() {
            for field in &mut self.fields {
                field.touched = true;
            }
            return None;
        }

        self.loading = true;
        self.error = None;
        let draft = AccountDraft::new(
            self.value(Field::AccountHolderName),
            self.value(Field::AccountNumber),
            parse_balance(self.value(Field::Balance)).unwrap_or(0.0),
        );
        Some(SubmitTicket {
            store: Arc::clone(&self.store),
            token: self.interest.clone(),
            mode: self.mode,
            draft,
        })
    }

    /// Applies a settled submit. Returns whether the form navigated away.
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> bool {
        if !outcome.token.is_current() {
            return false;
        }
        self.loading = false;
        match outcome.result {
            Ok(account) => {
                info!(account_id = account.id.0, "account saved");
                self.navigator.navigate(Route::AccountList);
                true
            }
            Err(err) => {
                self.error = user_message(FailureContext::SaveAccount(outcome.mode), &err);
                false
            }
        }
    }

    pub async fn submit(&mut self) -> bool {
        match self.begin_submit() {
            Some(ticket) => {
                let outcome = ticket.run().await;
                self.finish_submit(outcome)
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deactivate();
        self.navigator.navigate(Route::AccountList);
    }

    /// Stops listening for in-flight results, e.g. when the form is torn down.
    pub fn deactivate(&mut self) {
        self.tracker.deactivate();
        self.loading = false;
    }

    fn reset_fields(&mut self) {
        self.fields = Default::default();
        self.fields[Field::Balance.index()].value = DEFAULT_BALANCE.to_string();
    }

    fn populate(&mut self, account: &Account) {
        self.fields[Field::AccountHolderName.index()].value = account.account_holder_name.clone();
        self.fields[Field::AccountNumber.index()].value = account.account_number.clone();
        self.fields[Field::Balance.index()].value = account.balance.to_string();
    }
}

pub struct LoadTicket {
    store: Arc<AccountStore>,
    token: InterestToken,
    id: AccountId,
}

impl LoadTicket {
    pub fn account_id(&self) -> AccountId {
        self.id
    }

    pub async fn run(self) -> LoadOutcome {
        let result = self.token.guard(self.store.get_by_id(self.id)).await;
        LoadOutcome {
            token: self.token,
            result,
        }
    }
}

pub struct LoadOutcome {
    token: InterestToken,
    result: Result<Account, TransportError>,
}

pub struct SubmitTicket {
    store: Arc<AccountStore>,
    token: InterestToken,
    mode: FormMode,
    draft: AccountDraft,
}

impl SubmitTicket {
    pub fn draft(&self) -> &AccountDraft {
        &self.draft
    }

    pub async fn run(self) -> SubmitOutcome {
        let call = async {
            match self.mode {
                FormMode::Create => self.store.create(self.draft.clone()).await,
                FormMode::Edit(id) => self.store.update(id, self.draft.clone()).await,
            }
        };
        let result = self.token.guard(call).await;
        SubmitOutcome {
            token: self.token,
            mode: self.mode,
            result,
        }
    }
}

pub struct SubmitOutcome {
    token: InterestToken,
    mode: FormMode,
    result: Result<Account, TransportError>,
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
