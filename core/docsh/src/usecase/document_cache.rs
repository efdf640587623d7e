//! Document Cache: 種別ごとの最新 Markdown・タイトル・明示的な生成元を保持する
//!
//! 値はストアに永続化し、コピー／書き出し用の「現在の生テキスト」はメモリにも持つ。
//! 描画に失敗したら生テキストを表示する。

use crate::domain::{DocumentDisplay, DocumentKind, DocumentRecord, ViewEvent};
use crate::ports::outbound::{MarkdownRenderer, ViewSink};
use common::ports::outbound::{KeyValueStore, Log, LogLevel, LogRecord};
use std::collections::HashMap;
use std::sync::Arc;

pub struct DocumentCache {
    store: Arc<dyn KeyValueStore>,
    renderer: Arc<dyn MarkdownRenderer>,
    sink: Arc<dyn ViewSink>,
    log: Arc<dyn Log>,
    current_raw: HashMap<DocumentKind, String>,
}

impl DocumentCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn MarkdownRenderer>,
        sink: Arc<dyn ViewSink>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            store,
            renderer,
            sink,
            log,
            current_raw: HashMap::new(),
        }
    }

    /// 本文が空なら None
    pub fn get(&self, kind: DocumentKind) -> Option<DocumentRecord> {
        let content = self.read(kind.profile().content_key)?;
        let record = DocumentRecord::new(kind, content, self.title(kind));
        (!record.is_empty()).then_some(record)
    }

    pub fn title(&self, kind: DocumentKind) -> Option<String> {
        self.read(kind.profile().title_key)
    }

    /// 本文を保存して再描画する。空文字は消去として扱う。
    pub fn set(&mut self, kind: DocumentKind, content: &str, title: Option<&str>) {
        let key = kind.profile().content_key;
        if content.trim().is_empty() {
            self.remove(key);
        } else {
            self.write(key, content);
        }
        self.current_raw.insert(kind, content.to_string());
        if let Some(t) = title {
            self.set_title(kind, t);
        }
        self.show(kind);
    }

    pub fn set_title(&mut self, kind: DocumentKind, title: &str) {
        self.write(kind.profile().title_key, title);
        self.emit(&ViewEvent::TitleShown {
            kind,
            title: title.to_string(),
        });
    }

    /// 本文とタイトルを消し、案内文に戻す
    pub fn clear(&mut self, kind: DocumentKind) {
        let profile = kind.profile();
        self.remove(profile.content_key);
        self.remove(profile.title_key);
        self.current_raw.insert(kind, String::new());
        if let Some(default) = profile.default_title {
            self.emit(&ViewEvent::TitleShown {
                kind,
                title: default.to_string(),
            });
        }
        self.show(kind);
    }

    /// 現在の本文を描画して表示する
    pub fn show(&mut self, kind: DocumentKind) -> DocumentDisplay {
        let raw = self.current_raw(kind);
        let display = if raw.trim().is_empty() {
            DocumentDisplay::Placeholder(kind.profile().placeholder)
        } else {
            match self.renderer.render(&raw) {
                Ok(rendered) => DocumentDisplay::Rendered(rendered),
                Err(e) => {
                    let _ = self.log.log(
                        &LogRecord::new(LogLevel::Warn, "markdown render failed; showing raw text")
                            .layer("usecase")
                            .kind("render")
                            .field("kind", kind.slug())
                            .field("error", e.to_string()),
                    );
                    DocumentDisplay::Raw(raw)
                }
            }
        };
        self.emit(&ViewEvent::DocumentShown {
            kind,
            display: display.clone(),
        });
        display
    }

    /// コピー／書き出しに使う生の Markdown
    pub fn current_raw(&mut self, kind: DocumentKind) -> String {
        if let Some(raw) = self.current_raw.get(&kind) {
            return raw.clone();
        }
        let raw = self.read(kind.profile().content_key).unwrap_or_default();
        self.current_raw.insert(kind, raw.clone());
        raw
    }

    /// ユーザーが明示的に読み込んだ生成元（空なら None）
    pub fn source_override(&self, kind: DocumentKind) -> Option<String> {
        let key = kind.profile().source_override_key?;
        self.read(key).filter(|s| !s.trim().is_empty())
    }

    pub fn set_source_override(&mut self, kind: DocumentKind, content: &str) {
        if let Some(key) = kind.profile().source_override_key {
            self.write(key, content);
        }
    }

    pub fn clear_source_override(&mut self, kind: DocumentKind) {
        if let Some(key) = kind.profile().source_override_key {
            self.remove(key);
        }
    }

    /// 種別に属さない補助キー（読み込んだ保存文書の ID など）
    pub(crate) fn set_extra(&mut self, key: &str, value: &str) {
        self.write(key, value);
    }

    pub(crate) fn extra(&self, key: &str) -> Option<String> {
        self.read(key)
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            self.storage_failed(key, &e.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            self.storage_failed(key, &e.to_string());
        }
    }

    fn storage_failed(&self, key: &str, error: &str) {
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Warn, "document store write failed")
                .layer("usecase")
                .kind("storage")
                .field("key", key)
                .field("error", error),
        );
    }

    fn emit(&self, event: &ViewEvent) {
        let _ = self.sink.emit(event);
    }
}
