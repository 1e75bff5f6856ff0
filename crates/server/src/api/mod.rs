//! In-memory account registry behind the `/api/accounts` routes.

use std::{collections::BTreeMap, sync::Arc};

use shared::{
    domain::{Account, AccountDraft, AccountId},
    error::ApiError,
};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct ApiContext {
    registry: Arc<RwLock<Registry>>,
}

#[derive(Default)]
struct Registry {
    accounts: BTreeMap<AccountId, Account>,
    last_id: i64,
}

impl ApiContext {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn accounts_route() -> &'static str {
    "/api/accounts"
}

pub fn account_route() -> &'static str {
    "/api/accounts/:id"
}

pub async fn list_accounts(ctx: &ApiContext) -> Vec<Account> {
    ctx.registry.read().await.accounts.values().cloned().collect()
}

pub async fn get_account(ctx: &ApiContext, id: AccountId) -> Result<Account, ApiError> {
    ctx.registry
        .read()
        .await
        .accounts
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found(id))
}

pub async fn create_account(ctx: &ApiContext, draft: AccountDraft) -> Result<Account, ApiError> {
    validate(&draft)?;
    let mut registry = ctx.registry.write().await;
    registry.last_id += 1;
    let account = draft.with_id(AccountId(registry.last_id));
    registry.accounts.insert(account.id, account.clone());
    Ok(account)
}

/// Replaces the stored record wholesale. The path id wins over any id in the body.
pub async fn update_account(
    ctx: &ApiContext,
    id: AccountId,
    draft: AccountDraft,
) -> Result<Account, ApiError> {
    validate(&draft)?;
    let mut registry = ctx.registry.write().await;
    let slot = registry.accounts.get_mut(&id).ok_or_else(|| not_found(id))?;
    *slot = draft.with_id(id);
    Ok(slot.clone())
}

pub async fn delete_account(ctx: &ApiContext, id: AccountId) -> Result<(), ApiError> {
    ctx.registry
        .write()
        .await
        .accounts
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| not_found(id))
}

fn validate(draft: &AccountDraft) -> Result<(), ApiError> {
    if draft.account_holder_name.trim().is_empty() {
        return Err(ApiError::validation("Account holder name is required"));
    }
    if draft.account_number.trim().is_empty() {
        return Err(ApiError::validation("Account number is required"));
    }
    if !draft.balance.is_finite() || draft.balance < 0.0 {
        return Err(ApiError::validation(
            "Balance must be a non-negative number",
        ));
    }
    Ok(())
}

fn not_found(id: AccountId) -> ApiError {
    ApiError::not_found(format!("Account not found with id: {id}"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
