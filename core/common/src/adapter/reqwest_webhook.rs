//! reqwest（blocking）による WebhookTransport 実装

use crate::error::Error;
use crate::ports::outbound::{WebhookResponse, WebhookTransport};
use serde_json::Value;
use std::time::Duration;

/// JSON を POST する標準実装
///
/// タイムアウト超過は応答なしと同じく Err(Error::Http) になる。
pub struct ReqwestWebhookTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestWebhookTransport {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl WebhookTransport for ReqwestWebhookTransport {
    fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookResponse, Error> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::http(format!("Request to {} timed out", url))
                } else {
                    Error::http(format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
        Ok(WebhookResponse { status, body })
    }
}
