//! Maps failures to the text shown inline in the list and form views.

use tracing::error;

use crate::{error::TransportError, form::FormMode};

pub const LOAD_ACCOUNTS_FAILED: &str = "Failed to load accounts.";
pub const LOAD_ACCOUNT_FAILED: &str = "Failed to load account details.";
pub const DELETE_ACCOUNT_FAILED: &str = "Failed to delete account. Please try again.";
pub const SERVER_UNREACHABLE: &str =
    "Unable to connect to server. Please ensure the backend is running.";
pub const INVALID_INPUT: &str = "Invalid data provided. Please check your inputs.";
pub const RETRY_LATER: &str = "Server error occurred. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureContext {
    LoadAccounts,
    LoadAccount,
    DeleteAccount,
    SaveAccount(FormMode),
}

/// Text to show for a failed call, or `None` when the failure is a cancellation and
/// must stay silent.
pub fn user_message(context: FailureContext, err: &TransportError) -> Option<String> {
    if err.is_cancellation() {
        return None;
    }

    let message = match context {
        FailureContext::LoadAccounts => LOAD_ACCOUNTS_FAILED.to_string(),
        FailureContext::LoadAccount => LOAD_ACCOUNT_FAILED.to_string(),
        FailureContext::DeleteAccount => DELETE_ACCOUNT_FAILED.to_string(),
        FailureContext::SaveAccount(mode) => save_failure_message(mode, err),
    };
    Some(message)
}

fn save_failure_message(mode: FormMode, err: &TransportError) -> String {
    match err {
        TransportError::Unreachable(_) => SERVER_UNREACHABLE.to_string(),
        _ if err.is_client_error() => err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| INVALID_INPUT.to_string()),
        _ if err.is_server_error() => format!("{} {RETRY_LATER}", server_error_prefix(mode)),
        _ => match mode {
            FormMode::Create => "Failed to create account. Please try again.".to_string(),
            FormMode::Edit(_) => "Failed to update account. Please try again.".to_string(),
        },
    }
}

fn server_error_prefix(mode: FormMode) -> &'static str {
    match mode {
        FormMode::Create => "Error creating account.",
        FormMode::Edit(_) => "Error updating account.",
    }
}

/// Catch-all for errors no view handled. Cancellations are dropped silently; anything
/// else is logged. Returns whether the error was reported.
pub fn report_unhandled(err: &anyhow::Error) -> bool {
    let cancelled = err.chain().any(|cause| {
        cause
            .downcast_ref::<TransportError>()
            .is_some_and(TransportError::is_cancellation)
    });
    if cancelled {
        return false;
    }

    error!(error = %format!("{err:#}"), "unhandled error");
    true
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
