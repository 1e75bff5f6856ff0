use clap::{Args, Parser, Subcommand};
use client_core::{AccountForm, Field, Route};
use shared::domain::AccountId;

#[derive(Parser, Debug)]
#[command(name = "accounts", about = "Manage bank account records")]
pub struct Cli {
    /// Accounts API base URL; overrides client.toml and the environment.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show all accounts.
    List,
    /// Create an account.
    New(FieldArgs),
    /// Edit an existing account; omitted fields keep their current values.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an account after confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(long = "holder")]
    pub account_holder_name: Option<String>,
    #[arg(long = "number")]
    pub account_number: Option<String>,
    #[arg(long)]
    pub balance: Option<String>,
}

impl FieldArgs {
    pub fn apply(&self, form: &mut AccountForm) {
        let inputs = [
            (Field::AccountHolderName, &self.account_holder_name),
            (Field::AccountNumber, &self.account_number),
            (Field::Balance, &self.balance),
        ];
        for (field, value) in inputs {
            if let Some(value) = value {
                form.set_value(field, value.clone());
            }
        }
    }
}

impl Command {
    pub fn initial_route(&self) -> Route {
        match self {
            Self::List | Self::Delete { .. } => Route::AccountList,
            Self::New(_) => Route::NewAccount,
            Self::Edit { id, .. } => Route::EditAccount(AccountId(*id)),
        }
    }

    pub fn field_args(&self) -> Option<&FieldArgs> {
        match self {
            Self::New(fields) | Self::Edit { fields, .. } => Some(fields),
            _ => None,
        }
    }
}
