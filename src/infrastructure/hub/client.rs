use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::DomainError;
use crate::infrastructure::config::HubConfig;
use crate::infrastructure::hub::HubCredential;

/// Options understood by the hosted inference endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RequestOptions {
    pub wait_for_model: bool,
    pub use_cache: bool,
}

/// Authenticated JSON client for the inference API.
pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
    credential: HubCredential,
    options: RequestOptions,
}

impl HubClient {
    pub fn new(config: &HubConfig, credential: HubCredential) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential,
            options: RequestOptions {
                wait_for_model: config.wait_for_model,
                use_cache: config.use_cache,
            },
        })
    }

    pub fn options(&self) -> RequestOptions {
        self.options
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, DomainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(%url, "inference request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.credential.expose())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(DomainError::external(format!(
                "{url} returned {status}: {}",
                error_message(&text)
            )));
        }

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| DomainError::external(format!("malformed response from {url}: {e}")))?;

        // The endpoint reports some failures (e.g. model loading) in a 200 body.
        if value.get("error").is_some() {
            return Err(DomainError::external(format!(
                "{url} reported: {}",
                error_message(&text)
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| DomainError::external(format!("unexpected response from {url}: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::timeout(e.to_string())
    } else {
        DomainError::external(e.to_string())
    }
}

fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    match parsed.as_ref().and_then(|v| v.get("error")) {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(serde_json::Value::Array(messages)) => messages
            .iter()
            .filter_map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.chars().take(200).collect(),
    }
}
