//! HTTP access to the `/api/accounts` resource.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use shared::domain::{Account, AccountDraft, AccountId};
use tracing::debug;

use crate::error::TransportError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/accounts";

#[async_trait]
pub trait AccountsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Account>, TransportError>;
    async fn get(&self, id: AccountId) -> Result<Account, TransportError>;
    async fn create(&self, draft: &AccountDraft) -> Result<Account, TransportError>;
    async fn update(&self, id: AccountId, account: &Account) -> Result<Account, TransportError>;
    async fn delete(&self, id: AccountId) -> Result<(), TransportError>;
}

/// Error bodies come from different backends; only `message` is read.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct HttpAccountsApi {
    http: Client,
    base_url: String,
}

impl HttpAccountsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: AccountId) -> String {
        format!("{}/{}", self.base_url, id.0)
    }

    async fn expect_status(
        response: Response,
        accepted: &[StatusCode],
    ) -> Result<Response, TransportError> {
        let status = response.status();
        if accepted.contains(&status) {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|raw| serde_json::from_str::<ErrorBody>(&raw).ok())
            .and_then(|body| body.message);
        Err(TransportError::from_status(status, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AccountsApi for HttpAccountsApi {
    async fn list(&self) -> Result<Vec<Account>, TransportError> {
        debug!(url = %self.base_url, "GET accounts");
        let response = self.http.get(&self.base_url).send().await?;
        let response = Self::expect_status(response, &[StatusCode::OK]).await?;
        Self::decode(response).await
    }

    async fn get(&self, id: AccountId) -> Result<Account, TransportError> {
        debug!(account_id = id.0, "GET account");
        let response = self.http.get(self.item_url(id)).send().await?;
        let response = Self::expect_status(response, &[StatusCode::OK]).await?;
        Self::decode(response).await
    }

    async fn create(&self, draft: &AccountDraft) -> Result<Account, TransportError> {
        debug!("POST account");
        let response = self.http.post(&self.base_url).json(draft).send().await?;
        let response =
            Self::expect_status(response, &[StatusCode::OK, StatusCode::CREATED]).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: AccountId, account: &Account) -> Result<Account, TransportError> {
        debug!(account_id = id.0, "PUT account");
        let response = self
            .http
            .put(self.item_url(id))
            .json(account)
            .send()
            .await?;
        let response = Self::expect_status(response, &[StatusCode::OK]).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: AccountId) -> Result<(), TransportError> {
        debug!(account_id = id.0, "DELETE account");
        let response = self.http.delete(self.item_url(id)).send().await?;
        Self::expect_status(response, &[StatusCode::OK, StatusCode::NO_CONTENT]).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
