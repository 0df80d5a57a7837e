//! porta master API connector implementing AccountApi

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tenant_operator_core::prelude::*;
use tracing::{debug, error};
use url::Url;

mod config;
mod models;

pub use config::PortaConfig;
use models::*;

/// HTTP implementation of AccountApi against the porta master portal
pub struct PortaConnector {
    client: Client,
    config: PortaConfig,
}

impl PortaConnector {
    /// Create a new connector
    pub fn new(config: PortaConfig) -> Result<Self, ApiError> {
        Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid master URL '{}': {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the token, send, and map non-success statuses
    async fn execute(&self, request: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        let response = request
            .query(&[("access_token", self.config.access_token.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorBody>(&error_text)
                .ok()
                .and_then(|body| body.message())
                .unwrap_or(error_text);
            error!("porta API error {} for {}: {}", status, what, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T, ApiError> {
        let response = self.execute(request, what).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::ResponseParse(format!("Failed to parse {} response: {}", what, e)))
    }
}

#[async_trait]
impl AccountApi for PortaConnector {
    async fn show_account(&self, account_id: u64) -> Lookup<Account, ApiError> {
        let url = self.url(&format!("/master/api/providers/{}.json", account_id));
        debug!("GET {}", url);

        let result = self
            .fetch::<AccountEnvelope>(self.client.get(&url), &format!("account {}", account_id))
            .await
            .map(|envelope| envelope.account);
        Lookup::from_result(result, ApiError::is_not_found)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Account, ApiError> {
        let url = self.url("/master/api/signup.json");
        debug!("POST {}", url);

        let envelope: SignupEnvelope = self
            .fetch(self.client.post(&url).form(account), "signup")
            .await?;
        Ok(envelope.signup.account)
    }

    async fn update_account(&self, account_id: u64, update: &AccountUpdate) -> Result<Account, ApiError> {
        let url = self.url(&format!("/master/api/providers/{}.json", account_id));
        debug!("PUT {}", url);

        let envelope: AccountEnvelope = self
            .fetch(self.client.put(&url).form(update), &format!("account {}", account_id))
            .await?;
        Ok(envelope.account)
    }

    async fn list_users(&self, account_id: u64, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
        let url = self.url(&format!("/admin/api/accounts/{}/users.json", account_id));
        debug!("GET {}", url);

        let list: UserList = self
            .fetch(self.client.get(&url).query(filter), &format!("users of account {}", account_id))
            .await?;
        Ok(list.users.into_iter().map(|entry| entry.user).collect())
    }

    async fn read_user(&self, account_id: u64, user_id: u64) -> Result<User, ApiError> {
        let url = self.url(&format!("/admin/api/accounts/{}/users/{}.json", account_id, user_id));
        debug!("GET {}", url);

        let envelope: UserEnvelope = self
            .fetch(self.client.get(&url), &format!("user {} of account {}", user_id, account_id))
            .await?;
        Ok(envelope.user)
    }

    async fn update_user(&self, account_id: u64, user_id: u64, update: &UserUpdate) -> Result<User, ApiError> {
        let url = self.url(&format!("/admin/api/accounts/{}/users/{}.json", account_id, user_id));
        debug!("PUT {}", url);

        let envelope: UserEnvelope = self
            .fetch(
                self.client.put(&url).form(update),
                &format!("user {} of account {}", user_id, account_id),
            )
            .await?;
        Ok(envelope.user)
    }

    async fn activate_user(&self, account_id: u64, user_id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!(
            "/admin/api/accounts/{}/users/{}/activate.json",
            account_id, user_id
        ));
        debug!("PUT {}", url);

        self.execute(self.client.put(&url), &format!("user {} of account {}", user_id, account_id))
            .await?;
        Ok(())
    }

    async fn list_applications(&self, account_id: u64) -> Result<Vec<Application>, ApiError> {
        let url = self.url(&format!("/admin/api/accounts/{}/applications.json", account_id));
        debug!("GET {}", url);

        let list: ApplicationList = self
            .fetch(self.client.get(&url), &format!("applications of account {}", account_id))
            .await?;
        Ok(list.applications.into_iter().map(|entry| entry.application).collect())
    }
}
