use crate::core::error::HeartTalkError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Bearer-authenticated JSON poster bound to one endpoint URL.
#[derive(Clone)]
pub struct BaseApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl BaseApiClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, HeartTalkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// Like `From<reqwest::Error>`, but a timed-out call keeps its own
    /// category and reports the configured limit.
    pub fn classify(&self, err: reqwest::Error) -> HeartTalkError {
        if err.is_timeout() {
            HeartTalkError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Response, HeartTalkError> {
        debug!(endpoint = %self.endpoint, "POST");
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        Ok(response)
    }
}
