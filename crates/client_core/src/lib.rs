//! Client core for the bank accounts front-end: REST transport, the reconciling
//! account store, and the list/form controllers that render from it.

pub mod config;
pub mod currency;
pub mod error;
pub mod form;
pub mod interest;
pub mod list;
pub mod navigation;
pub mod store;
pub mod surface;
pub mod transport;

pub use error::TransportError;
pub use form::{AccountForm, Field, FieldError, FormMode};
pub use interest::{ActivationTracker, InterestToken};
pub use list::{AccountList, AccountRow, Confirmation};
pub use navigation::{Navigator, Route};
pub use store::{AccountStore, AccountsView};
pub use transport::{AccountsApi, HttpAccountsApi};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
