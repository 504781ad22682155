use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use common::config::{Account, ApiConfig};

#[derive(Debug, Error)]
pub enum TicketApiError {
    #[error("ticket api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
}

impl TicketApiError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match *self {
            TicketApiError::Http { status, .. } => status,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            TicketApiError::Http { endpoint, .. } => endpoint.as_str(),
        }
    }
}

/// Read-only surface of the ticketing API. Credentials travel with every
/// call so the same client serves both the manager and analyst roles.
#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn list_tickets(&self, account: &Account) -> Result<Vec<Value>>;
    async fn ticket_detail(&self, ticket_id: &str, account: &Account) -> Result<Value>;
    async fn list_categories(&self, account: &Account) -> Result<Vec<Value>>;
}

pub struct HttpTicketClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpTicketClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base = Url::parse(&config.base_url)?;
        Ok(Self { http, base })
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "dispatching ticket api request");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TicketApiError::status(status, endpoint).into());
        }
        let value: Value = response.json().await?;
        Ok(value)
    }

    async fn get_json_array(&self, url: Url) -> Result<Vec<Value>> {
        match self.get_json(url).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("expected array response")),
        }
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_credentials(url: &mut Url, account: &Account) {
        let mut query_pairs = url.query_pairs_mut();
        query_pairs.append_pair("login", &account.login);
        query_pairs.append_pair("code", &account.code);
    }
}

#[async_trait]
impl TicketApi for HttpTicketClient {
    async fn list_tickets(&self, account: &Account) -> Result<Vec<Value>> {
        let mut url = self.join("api/v1/tickets")?;
        Self::with_credentials(&mut url, account);
        self.get_json_array(url).await
    }

    async fn ticket_detail(&self, ticket_id: &str, account: &Account) -> Result<Value> {
        let mut url = self.join(&format!("api/v1/tickets/{ticket_id}"))?;
        Self::with_credentials(&mut url, account);
        self.get_json(url).await
    }

    async fn list_categories(&self, account: &Account) -> Result<Vec<Value>> {
        let mut url = self.join("api/v1/categories")?;
        Self::with_credentials(&mut url, account);
        self.get_json_array(url).await
    }
}
