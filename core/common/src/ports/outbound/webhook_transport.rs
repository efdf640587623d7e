//! webhook 送信 Outbound ポート
//!
//! JSON を POST して、ステータスと本文をそのまま返す。
//! 非 2xx は Ok で返し、解釈は呼び出し側が行う。Err は応答が得られなかった場合のみ。

use crate::error::Error;
use serde_json::Value;

/// webhook の応答（ステータスと生の本文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// JSON を POST する抽象
pub trait WebhookTransport: Send + Sync {
    /// `url` へ `payload` を POST する。ネットワーク障害・タイムアウト時は Err(Error::Http)。
    fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(WebhookResponse::new(200, "").is_success());
        assert!(WebhookResponse::new(204, "").is_success());
        assert!(!WebhookResponse::new(302, "").is_success());
        assert!(!WebhookResponse::new(500, "oops").is_success());
    }
}
