//! Implements the `Api` trait over HTTP with `reqwest`.

use crate::api::response::{self, NameFallback};
use crate::api::{Api, Created};
use crate::error::ApiError;
use crate::model::{NewTransaction, Period, Transaction};
use crate::Result;
use anyhow::Context;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, trace};
use url::Url;

pub(crate) struct HttpApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpApi {
    pub(crate) fn new(api_url: &Url, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self {
            client,
            base: base_url(api_url),
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Unable to build the URL for '{path}'"))
    }

    /// Sends `request` with the session token and returns the parsed JSON body. An empty body is
    /// `Value::Null`.
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await.map_err(ApiError::Network)?;
        trace!("{status} from {url}");
        if !status.is_success() {
            debug!("Request to {url} failed with {status}: {body}");
            return Err(ApiError::from_status(status, response::error_message(&body)).into());
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let value = serde_json::from_str(&body)
            .map_err(|e| ApiError::unexpected_shape(format!("invalid JSON from {url}: {e}")))?;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl Api for HttpApi {
    async fn fetch_transactions_today(&mut self) -> Result<Vec<Transaction>> {
        let url = self.endpoint("transactions/today")?;
        let body = self.send(self.client.get(url)).await?;
        Ok(response::transactions(body, NameFallback::ByType)?)
    }

    async fn fetch_transactions_for_month(&mut self, period: Period) -> Result<Vec<Transaction>> {
        let url = self.endpoint("transactions/month")?;
        let request = self.client.get(url).query(&[
            ("month", period.month().to_string()),
            ("year", period.year().to_string()),
        ]);
        let body = self.send(request).await?;
        Ok(response::transactions(body, NameFallback::Unknown)?)
    }

    async fn create_transaction(&mut self, transaction: &NewTransaction) -> Result<Created> {
        let url = self.endpoint("transactions")?;
        let request = self.client.post(url).json(&json!({
            "amount": transaction.amount.to_f64(),
            "category": transaction.category,
            "type": transaction.kind,
            "date": transaction.date.format("%Y-%m-%d").to_string(),
        }));
        let body = self.send(request).await?;
        Ok(Created {
            id: response::created_id(&body),
        })
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<String> {
        let url = self.endpoint("auth/login")?;
        let request = self
            .client
            .post(url)
            .json(&json!({ "email": email, "password": password }));
        let body = self.send(request).await?;
        let token = response::token(&body)?;
        self.token = Some(token.clone());
        Ok(token)
    }

    async fn logout(&mut self) -> Result<()> {
        let url = self.endpoint("auth/logout")?;
        self.send(self.client.post(url)).await?;
        self.token = None;
        Ok(())
    }
}

/// `Url::join` replaces the last path segment unless the base ends with a slash.
fn base_url(api_url: &Url) -> Url {
    let mut base = api_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
