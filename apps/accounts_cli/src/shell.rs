//! Drives the list and form controllers through the route queue and renders them
//! as plain text.

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use client_core::{
    AccountForm, AccountList, AccountStore, Confirmation, Navigator, Route,
};
use shared::domain::AccountId;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::Command;

pub struct Shell {
    list: AccountList,
    form: AccountForm,
    routes: mpsc::UnboundedReceiver<Route>,
}

impl Shell {
    pub fn new(store: Arc<AccountStore>) -> Self {
        let (tx, routes) = mpsc::unbounded_channel();
        let navigator: Arc<dyn Navigator> = Arc::new(tx);
        Self {
            list: AccountList::new(Arc::clone(&store), Arc::clone(&navigator)),
            form: AccountForm::new(store, navigator),
            routes,
        }
    }

    /// Runs one command to completion. Returns whether it succeeded; failures have
    /// already been rendered to `out`.
    pub async fn run(
        &mut self,
        command: &Command,
        confirmation: &dyn Confirmation,
        out: &mut dyn Write,
    ) -> io::Result<bool> {
        let mut pending_delete = match command {
            Command::Delete { id, .. } => Some(AccountId(*id)),
            _ => None,
        };
        let mut route = command.initial_route();

        loop {
            debug!(path = %route.path(), "activating route");
            match route {
                Route::AccountList => {
                    self.form.deactivate();
                    self.list.activate().await;
                    if let Some(id) = pending_delete.take() {
                        if self.list.error().is_none()
                            && !self.list.delete(id, confirmation).await
                            && self.list.error().is_none()
                        {
                            writeln!(out, "Delete cancelled.")?;
                        }
                    }
                    render_list(out, &self.list)?;
                    return Ok(self.list.error().is_none());
                }
                Route::NewAccount | Route::EditAccount(_) => {
                    self.list.deactivate();
                    self.form.activate(route.account_id()).await;
                    if let Some(error) = self.form.error() {
                        writeln!(out, "error: {error}")?;
                        return Ok(false);
                    }
                    if let Some(fields) = command.field_args() {
                        fields.apply(&mut self.form);
                    }
                    if !self.form.submit().await {
                        render_form_errors(out, &self.form)?;
                        return Ok(false);
                    }
                }
            }

            match self.routes.try_recv() {
                Ok(next) => route = next,
                Err(_) => return Ok(true),
            }
        }
    }
}

pub fn render_list(out: &mut dyn Write, list: &AccountList) -> io::Result<()> {
    if let Some(error) = list.error() {
        writeln!(out, "error: {error}")?;
    }

    let rows = list.rows();
    if rows.is_empty() {
        writeln!(out, "No accounts found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<6} {:<28} {:<14} {:>16}",
        "ID", "HOLDER", "ACCOUNT NUMBER", "BALANCE"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<6} {:<28} {:<14} {:>16}",
            row.id.to_string(),
            row.account_holder_name,
            row.account_number,
            row.balance_display
        )?;
    }
    Ok(())
}

pub fn render_form_errors(out: &mut dyn Write, form: &AccountForm) -> io::Result<()> {
    if let Some(error) = form.error() {
        writeln!(out, "error: {error}")?;
    }
    for (_, message) in form.visible_errors() {
        writeln!(out, "  {message}")?;
    }
    Ok(())
}

pub struct PromptConfirmation {
    pub assume_yes: bool,
}

impl Confirmation for PromptConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
