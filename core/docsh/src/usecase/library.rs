//! 文書ライブラリ: one-pager の保存・一覧・読み込み

use crate::domain::{diagnostic_text, ChatTurn, DocshConfig, DocumentKind, Endpoint, SavedDocument};
use crate::usecase::view_controller::ViewController;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord, WebhookTransport};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("Nothing to save. Please generate or refine a one-pager first.")]
    NothingToSave,
    #[error("Save cancelled. No name provided.")]
    EmptyName,
    #[error("Could not load document content.")]
    NoContent,
    #[error("{0}")]
    Transport(Error),
    #[error("Request failed ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Malformed(String),
}

pub struct DocumentLibrary {
    transport: Arc<dyn WebhookTransport>,
    config: Arc<DocshConfig>,
    log: Arc<dyn Log>,
}

impl DocumentLibrary {
    pub fn new(transport: Arc<dyn WebhookTransport>, config: Arc<DocshConfig>, log: Arc<dyn Log>) -> Self {
        Self {
            transport,
            config,
            log,
        }
    }

    /// 現在の one-pager を名前を付けて保存する。結果は one-pager のチャットにも残す。
    pub fn save(&self, vc: &mut ViewController, name: &str) -> Result<String, LibraryError> {
        let kind = DocumentKind::OnePager;
        let result = self.try_save(vc, name);
        let text = match &result {
            Ok(message) => message.clone(),
            Err(e) => e.to_string(),
        };
        vc.append_turn(kind, ChatTurn::assistant(text));
        result
    }

    fn try_save(&self, vc: &mut ViewController, name: &str) -> Result<String, LibraryError> {
        let kind = DocumentKind::OnePager;
        let content = vc.current_raw(kind);
        if content.trim().is_empty() {
            return Err(LibraryError::NothingToSave);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        let document_id = vc.ensure_session_id(kind);
        let payload = json!({
            "name": name,
            "content": content,
            "userId": self.config.user_id,
            "documentId": document_id.to_string(),
        });
        let body = self.post(Endpoint::Save, &payload)?;
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "One-pager saved successfully!".to_string());
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "document saved")
                .layer("usecase")
                .kind("library")
                .field("name", name),
        );
        Ok(message)
    }

    /// 保存済み文書の一覧
    pub fn list(&self) -> Result<Vec<SavedDocument>, LibraryError> {
        let payload = json!({ "userId": self.config.user_id });
        let body = self.post(Endpoint::List, &payload)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str::<Vec<SavedDocument>>(&body)
            .map_err(|e| LibraryError::Malformed(e.to_string()))
    }

    /// 保存済み文書を one-pager に読み込む。一覧に本文が無ければ取得する。
    pub fn open(&self, vc: &mut ViewController, doc: &SavedDocument) -> Result<(), LibraryError> {
        let content = match doc.inline_content() {
            Some(c) => Some(c.to_string()),
            None => self.fetch_content(&doc.id)?,
        };
        let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
            vc.append_turn(
                DocumentKind::OnePager,
                ChatTurn::assistant(LibraryError::NoContent.to_string()),
            );
            return Err(LibraryError::NoContent);
        };
        vc.load_saved_document(&doc.id, &content);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "document opened")
                .layer("usecase")
                .kind("library")
                .field("document_id", doc.id.as_str()),
        );
        Ok(())
    }

    fn fetch_content(&self, document_id: &str) -> Result<Option<String>, LibraryError> {
        let payload = json!({
            "userId": self.config.user_id,
            "documentId": document_id,
        });
        let body = self.post(Endpoint::Get, &payload)?;
        let v: Value = serde_json::from_str(&body).map_err(|e| LibraryError::Malformed(e.to_string()))?;
        Ok(v
            .get("content")
            .or_else(|| v.get("Content"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn post(&self, endpoint: Endpoint, payload: &Value) -> Result<String, LibraryError> {
        let url = self.config.url_for(endpoint);
        let response = self.transport.post_json(&url, payload).map_err(|e| {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "library request failed")
                    .layer("usecase")
                    .kind("library")
                    .field("endpoint", endpoint.name())
                    .field("error", e.to_string()),
            );
            LibraryError::Transport(e)
        })?;
        if !response.is_success() {
            return Err(LibraryError::Rejected {
                status: response.status,
                message: diagnostic_text(&response.body),
            });
        }
        Ok(response.body)
    }
}
