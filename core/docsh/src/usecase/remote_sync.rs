//! Remote Sync Client: ユーザー入力を外部ワークフローへ送り、応答を反映する
//!
//! 送信は begin（状態の確認と送信内容の確定）→ dispatch（通信、別スレッド可）→ complete（反映）
//! の 3 段に分ける。begin と complete は状態を所有するスレッドで呼ぶ。
//! complete は、送信時に捕まえた識別子が現在の識別子と一致するときだけ応答を反映する。

use crate::domain::{
    diagnostic_text, ChatTurn, DocshConfig, DocumentKind, Endpoint, SessionId, SourceRule,
    SyncReply,
};
use crate::usecase::view_controller::{ViewController, MISSING_BRIEFING_SOURCE};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord, WebhookResponse, WebhookTransport};
use serde_json::{json, Value};
use std::sync::Arc;

/// begin で確定した送信内容
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSync {
    pub kind: DocumentKind,
    /// 送信時点の識別子（応答の反映可否の判定に使う）
    pub session_id: SessionId,
    pub url: String,
    pub payload: Value,
}

/// complete の結果
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Applied(SyncReply),
    /// 非 2xx。チャットに診断を出し、文書は変えない。
    StatusError { status: u16 },
    /// 応答が得られなかった（タイムアウトを含む）
    TransportFailed,
    /// 2xx だが本文が解釈できない
    MalformedReply,
    /// 送信後にリセットされた種別への応答。何も反映しない。
    Stale,
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }
}

/// 送信前にローカルで止めた理由
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncRejected {
    #[error("empty input")]
    EmptyInput,
    #[error("{} assistant is still working on the previous message", .0.label())]
    Busy(DocumentKind),
    #[error("no source document available for {}", .0.label())]
    MissingSource(DocumentKind),
}

/// 入力をチャットに表示するか（/new の start は表示しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    Shown,
    Hidden,
}

#[derive(Clone)]
pub struct RemoteSync {
    transport: Arc<dyn WebhookTransport>,
    config: Arc<DocshConfig>,
    log: Arc<dyn Log>,
}

impl RemoteSync {
    pub fn new(transport: Arc<dyn WebhookTransport>, config: Arc<DocshConfig>, log: Arc<dyn Log>) -> Self {
        Self {
            transport,
            config,
            log,
        }
    }

    /// 入力を検証して送信内容を確定し、種別を送信中にする
    pub fn begin(
        &self,
        vc: &mut ViewController,
        kind: DocumentKind,
        input: &str,
        echo: Echo,
    ) -> Result<PendingSync, SyncRejected> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SyncRejected::EmptyInput);
        }
        if vc.is_busy(kind) {
            return Err(SyncRejected::Busy(kind));
        }

        let profile = kind.profile();
        let source = vc.source_for(kind);
        if profile.source_rule == SourceRule::Required && source.is_none() {
            vc.append_turn(kind, ChatTurn::assistant(MISSING_BRIEFING_SOURCE));
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Info, "request not sent: source missing")
                    .layer("usecase")
                    .kind("sync")
                    .field("kind", kind.slug()),
            );
            return Err(SyncRejected::MissingSource(kind));
        }

        if echo == Echo::Shown {
            vc.append_turn(kind, ChatTurn::user(input));
        }
        let session_id = vc.ensure_session_id(kind);

        let mut payload = json!({
            "userInput": input,
            "documentId": session_id.to_string(),
        });
        if let (Some(field), Some(obj)) = (profile.source_field, payload.as_object_mut()) {
            let value = source.map(Value::String).unwrap_or(Value::Null);
            obj.insert(field.to_string(), value);
        }

        vc.set_busy(kind, true);
        Ok(PendingSync {
            kind,
            session_id,
            url: self.config.url_for(Endpoint::Message(kind)),
            payload,
        })
    }

    /// 通信だけを行う（状態に触れないので別スレッドから呼べる）
    pub fn dispatch(&self, pending: &PendingSync) -> Result<WebhookResponse, Error> {
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "request sent")
                .layer("usecase")
                .kind("sync")
                .field("kind", pending.kind.slug())
                .field("url", pending.url.as_str()),
        );
        self.transport.post_json(&pending.url, &pending.payload)
    }

    /// 応答を反映する。送信中フラグはどの結果でも解除する。
    pub fn complete(
        &self,
        vc: &mut ViewController,
        pending: PendingSync,
        result: Result<WebhookResponse, Error>,
    ) -> SyncOutcome {
        let kind = pending.kind;
        vc.set_busy(kind, false);

        if vc.session_id(kind).as_ref() != Some(&pending.session_id) {
            self.log_outcome(kind, LogLevel::Info, "stale reply dropped", None);
            return SyncOutcome::Stale;
        }

        let label = kind.label();
        let response = match result {
            Ok(r) => r,
            Err(e) => {
                self.log_outcome(kind, LogLevel::Warn, "transport failed", Some(e.to_string()));
                vc.append_turn(
                    kind,
                    ChatTurn::assistant(format!(
                        "Network error or issue with {} assistant. Please try again. ({})",
                        label, e
                    )),
                );
                return SyncOutcome::TransportFailed;
            }
        };

        if !response.is_success() {
            let diag = diagnostic_text(&response.body);
            self.log_outcome(kind, LogLevel::Warn, "non-success status", Some(response.status.to_string()));
            vc.append_turn(
                kind,
                ChatTurn::assistant(format!(
                    "Error with {} assistant: {}: {}",
                    label, response.status, diag
                )),
            );
            return SyncOutcome::StatusError {
                status: response.status,
            };
        }

        let reply = match SyncReply::parse(kind, &response.body) {
            Ok(r) => r,
            Err(e) => {
                self.log_outcome(kind, LogLevel::Warn, "malformed reply", Some(e.to_string()));
                vc.append_turn(
                    kind,
                    ChatTurn::assistant(format!(
                        "Error with {} assistant: unreadable reply ({})",
                        label, e
                    )),
                );
                return SyncOutcome::MalformedReply;
            }
        };

        if let Some(text) = &reply.chat_reply {
            vc.append_turn(kind, ChatTurn::assistant(text.clone()));
        }
        if let Some(title) = &reply.title {
            vc.apply_title(kind, title);
        }
        if let Some(content) = &reply.content {
            if reply.title.is_none() && !content.trim().is_empty() && vc.stored_title(kind).is_none() {
                if let Some(default) = kind.profile().default_title {
                    vc.apply_title(kind, default);
                }
            }
            vc.apply_content(kind, content);
        }
        if reply.is_empty() {
            self.log_outcome(kind, LogLevel::Debug, "reply carried no fields", None);
        } else {
            self.log_outcome(kind, LogLevel::Debug, "reply applied", None);
        }
        SyncOutcome::Applied(reply)
    }

    /// begin → dispatch → complete を同じスレッドで続けて行う
    pub fn send(
        &self,
        vc: &mut ViewController,
        kind: DocumentKind,
        input: &str,
        echo: Echo,
    ) -> Result<SyncOutcome, SyncRejected> {
        let pending = self.begin(vc, kind, input, echo)?;
        let result = self.dispatch(&pending);
        Ok(self.complete(vc, pending, result))
    }

    fn log_outcome(&self, kind: DocumentKind, level: LogLevel, message: &str, detail: Option<String>) {
        let mut rec = LogRecord::new(level, message)
            .layer("usecase")
            .kind("sync")
            .field("kind", kind.slug());
        if let Some(d) = detail {
            rec = rec.field("detail", d);
        }
        let _ = self.log.log(&rec);
    }
}
