//! View Controller: 表示中の種別を切り替え、各コンポーネントを遅延初期化する
//!
//! 遷移は activate（任意の種別 → k）と reset（自己遷移）の 2 つだけ。
//! 案内文はチャットが空のときに 1 回だけ追加する。

use crate::domain::{
    title_snippet, ChatTurn, DocumentKind, DocumentRecord, SessionId, SourceRule, ViewEvent,
    ViewMode,
};
use crate::ports::outbound::ViewSink;
use crate::usecase::app_state::AppState;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// report の案内文に載せる one-pager タイトルの最大文字数
const SNIPPET_CHARS: usize = 30;
const SOURCE_PREVIEW_CHARS: usize = 80;
/// 読み込んだ保存文書の ID を保存するキー
pub const LOADED_DOCUMENT_KEY: &str = "onePagerActiveDocumentID";

pub const MISSING_BRIEFING_SOURCE: &str = "Error: No one-pager loaded for briefing. Please use /source to load one or switch to the One Pager view to create one.";

pub struct ViewController {
    state: AppState,
    sink: Arc<dyn ViewSink>,
    log: Arc<dyn Log>,
}

impl ViewController {
    pub fn new(state: AppState, sink: Arc<dyn ViewSink>, log: Arc<dyn Log>) -> Self {
        Self { state, sink, log }
    }

    pub fn active(&self) -> DocumentKind {
        self.state.active
    }

    /// 種別を表示する。識別子を用意し、文書と（必要なら）案内文を出す。
    pub fn activate(&mut self, kind: DocumentKind) {
        self.state.active = kind;
        self.state.identifiers.get_or_create(kind);

        let source = self.source_for(kind);
        let mode = match (kind.profile().source_rule, &source) {
            (SourceRule::Required, None) => ViewMode::SourceInput,
            _ => ViewMode::Chat,
        };
        self.state.modes.insert(kind, mode);
        self.emit(&ViewEvent::Activated { kind, mode });

        self.show(kind);
        if let Some(src) = &source {
            self.emit(&ViewEvent::SourceShown {
                kind,
                preview: title_snippet(src, SOURCE_PREVIEW_CHARS),
            });
        }

        if self.state.transcripts.is_empty(kind) {
            let prompt = self.prompt_for(kind, source.as_deref());
            self.state.transcripts.append(kind, ChatTurn::assistant(prompt));
        }
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "view activated")
                .layer("usecase")
                .kind("view")
                .field("kind", kind.slug()),
        );
    }

    /// 識別子・文書・チャット・明示的な生成元を初期化してから activate する
    pub fn reset(&mut self, kind: DocumentKind) {
        let id = self.state.identifiers.reset(kind);
        self.state.documents.clear(kind);
        self.state.transcripts.clear(kind);
        self.state.documents.clear_source_override(kind);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "document reset")
                .layer("usecase")
                .kind("view")
                .field("kind", kind.slug())
                .field("session_id", id.to_string()),
        );
        self.activate(kind);
    }

    /// 生成元を明示的に読み込む（briefing / report）。別の文書として新しい識別子で始め直す。
    pub fn load_source(&mut self, kind: DocumentKind, content: &str) -> Result<(), Error> {
        if kind.profile().source_override_key.is_none() {
            return Err(Error::invalid_argument(format!(
                "The {} view does not take a source document. Switch to briefing or report first.",
                kind.label()
            )));
        }
        if content.trim().is_empty() {
            return Err(Error::invalid_argument("Source document is empty."));
        }

        self.state.documents.set_source_override(kind, content);
        let id = self.state.identifiers.reset(kind);
        self.state.transcripts.clear(kind);
        self.state.documents.clear(kind);
        self.state.active = kind;
        self.state.modes.insert(kind, ViewMode::Chat);
        self.emit(&ViewEvent::Activated {
            kind,
            mode: ViewMode::Chat,
        });
        self.emit(&ViewEvent::SourceShown {
            kind,
            preview: title_snippet(content, SOURCE_PREVIEW_CHARS),
        });

        let prompt = match kind {
            DocumentKind::Briefing => "One-pager loaded. Specify target audience (e.g., 'Executives').",
            _ => "Source document loaded. Describe the report you need based on this document.",
        };
        self.state.transcripts.append(kind, ChatTurn::assistant(prompt));
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "source loaded")
                .layer("usecase")
                .kind("view")
                .field("kind", kind.slug())
                .field("session_id", id.to_string()),
        );
        Ok(())
    }

    /// 生成に使う元文書。明示的な生成元が one-pager 本文より優先する。
    pub fn source_for(&self, kind: DocumentKind) -> Option<String> {
        if kind.profile().source_rule == SourceRule::NotUsed {
            return None;
        }
        self.state
            .documents
            .source_override(kind)
            .or_else(|| self.document(DocumentKind::OnePager).map(|r| r.content))
    }

    /// 文書とタイトルを表示し直す
    pub fn show(&mut self, kind: DocumentKind) {
        let profile = kind.profile();
        let title = self
            .state
            .documents
            .title(kind)
            .or_else(|| profile.default_title.map(str::to_string));
        if let Some(title) = title {
            self.emit(&ViewEvent::TitleShown { kind, title });
        }
        self.state.documents.show(kind);
    }

    /// 保存済み文書を one-pager に読み込み、新しい識別子で会話を始め直す
    pub fn load_saved_document(&mut self, document_id: &str, content: &str) {
        let kind = DocumentKind::OnePager;
        self.state.documents.set(kind, content, None);
        self.state.documents.set_extra(LOADED_DOCUMENT_KEY, document_id);
        self.state.identifiers.regenerate_for_loaded(kind);
        self.state.transcripts.clear(kind);
        let short: String = document_id.chars().take(10).collect();
        self.state.transcripts.append(
            kind,
            ChatTurn::assistant(format!(
                "Loaded document: \"{}...\". You can now refine it.",
                short
            )),
        );
        self.activate(kind);
    }

    pub fn mode(&self, kind: DocumentKind) -> ViewMode {
        self.state.mode(kind)
    }

    pub fn transcript(&self, kind: DocumentKind) -> &[ChatTurn] {
        self.state.transcripts.turns(kind)
    }

    pub fn document(&self, kind: DocumentKind) -> Option<DocumentRecord> {
        self.state.documents.get(kind)
    }

    pub fn current_raw(&mut self, kind: DocumentKind) -> String {
        self.state.documents.current_raw(kind)
    }

    pub fn session_id(&self, kind: DocumentKind) -> Option<SessionId> {
        self.state.identifiers.current(kind)
    }

    pub fn loaded_document_id(&self) -> Option<String> {
        self.state.documents.extra(LOADED_DOCUMENT_KEY)
    }

    pub fn is_busy(&self, kind: DocumentKind) -> bool {
        self.state.is_busy(kind)
    }

    /// 画面に案内を出す（チャットには残さない）
    pub fn notice(&self, text: impl Into<String>) {
        self.emit(&ViewEvent::Notice {
            kind: self.state.active,
            text: text.into(),
        });
    }

    pub(crate) fn ensure_session_id(&mut self, kind: DocumentKind) -> SessionId {
        self.state.identifiers.get_or_create(kind)
    }

    pub(crate) fn append_turn(&mut self, kind: DocumentKind, turn: ChatTurn) {
        self.state.transcripts.append(kind, turn);
    }

    pub(crate) fn set_busy(&mut self, kind: DocumentKind, busy: bool) {
        let changed = if busy {
            self.state.busy.insert(kind)
        } else {
            self.state.busy.remove(&kind)
        };
        if changed {
            self.emit(&ViewEvent::InputBusy { kind, busy });
        }
    }

    pub(crate) fn apply_content(&mut self, kind: DocumentKind, content: &str) {
        self.state.documents.set(kind, content, None);
    }

    pub(crate) fn apply_title(&mut self, kind: DocumentKind, title: &str) {
        self.state.documents.set_title(kind, title);
    }

    pub(crate) fn stored_title(&self, kind: DocumentKind) -> Option<String> {
        self.state.documents.title(kind)
    }

    pub(crate) fn log(&self) -> &Arc<dyn Log> {
        &self.log
    }

    fn prompt_for(&self, kind: DocumentKind, source: Option<&str>) -> String {
        match (kind, source) {
            (DocumentKind::OnePager, _) => {
                if self.document(DocumentKind::OnePager).is_some() {
                    "Active one-pager loaded. Type to refine, or 'start' for a new one (this will clear the current one-pager).".to_string()
                } else {
                    "Type 'start' to create a new one-pager.".to_string()
                }
            }
            (DocumentKind::Briefing, Some(_)) => {
                "Using loaded one-pager. Specify target audience (e.g., 'Executives').".to_string()
            }
            (DocumentKind::Briefing, None) => {
                "No one-pager available. Load one with /source <file>, or switch to the One Pager view (/view onepager) to create one.".to_string()
            }
            (DocumentKind::Report, Some(src)) => format!(
                "Using active one-pager (\"{}...\"). Describe the report you need based on this document.",
                title_snippet(src, SNIPPET_CHARS)
            ),
            (DocumentKind::Report, None) => {
                "No active one-pager found. Describe the report you need (you might be prompted for more details or to create a one-pager first).".to_string()
            }
        }
    }

    fn emit(&self, event: &ViewEvent) {
        let _ = self.sink.emit(event);
    }
}
