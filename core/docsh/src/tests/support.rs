//! テスト用スタブ（ポートの差し替え）と組み立て

use crate::domain::{DocshConfig, DocumentDisplay, DocumentKind, ViewEvent};
use crate::ports::outbound::{MarkdownRenderer, ViewSink};
use crate::usecase::app::DocshUseCase;
use crate::wiring::{build_use_case, Ports};
use common::adapter::{MemoryKeyValueStore, NoopLog, StdFileSystem};
use common::domain::CorrelationToken;
use common::error::Error;
use common::ports::outbound::{IdGenerator, KeyValueStore, WebhookResponse, WebhookTransport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// `1700000000000_<連番 13 桁>` を順に返す
#[derive(Default)]
pub struct SequencedIds(Mutex<u64>);

impl IdGenerator for SequencedIds {
    fn next_id(&self) -> CorrelationToken {
        let mut n = self.0.lock().unwrap();
        *n += 1;
        CorrelationToken::new(format!("1700000000000_{:013}", *n))
    }
}

#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<ViewEvent>>);

impl RecordingSink {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn last_display(&self, kind: DocumentKind) -> Option<DocumentDisplay> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::DocumentShown { kind: k, display } if k == kind => Some(display),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Notice { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl ViewSink for RecordingSink {
    fn emit(&self, event: &ViewEvent) -> Result<(), Error> {
        self.0.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// 用意した応答を順に返し、呼び出しを記録する。用意が尽きたら `200 {}`。
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<WebhookResponse, Error>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn push_ok(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(WebhookResponse::new(status, body)));
    }

    pub fn push_err(&self, err: Error) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl WebhookTransport for ScriptedTransport {
    fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookResponse, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(WebhookResponse::new(200, "{}")))
    }
}

/// 見出し記号を外すだけの描画
pub struct PlainRenderer;

impl MarkdownRenderer for PlainRenderer {
    fn render(&self, markdown: &str) -> Result<String, Error> {
        Ok(markdown.replace('#', "").trim().to_string())
    }
}

pub struct FailingRenderer;

impl MarkdownRenderer for FailingRenderer {
    fn render(&self, _markdown: &str) -> Result<String, Error> {
        Err(Error::system("render failed"))
    }
}

/// すべての操作が失敗するストア
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        Err(Error::io_msg("disk gone"))
    }
    fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
        Err(Error::io_msg("disk gone"))
    }
    fn remove(&self, _key: &str) -> Result<(), Error> {
        Err(Error::io_msg("disk gone"))
    }
}

/// 読み込みは続けられるが、break_writes 以降の書き込みが失敗するストア
pub struct BreakableStore {
    inner: MemoryKeyValueStore,
    broken: AtomicBool,
}

impl BreakableStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryKeyValueStore::new(),
            broken: AtomicBool::new(false),
        }
    }

    pub fn break_writes(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), Error> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(Error::io_msg("read-only filesystem"));
        }
        Ok(())
    }
}

impl KeyValueStore for BreakableStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner.get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.check()?;
        self.inner.set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), Error> {
        self.check()?;
        self.inner.remove(key)
    }
}

pub struct Harness {
    pub app: DocshUseCase,
    pub sink: Arc<RecordingSink>,
    pub transport: Arc<ScriptedTransport>,
}

pub struct HarnessBuilder {
    store: Arc<dyn KeyValueStore>,
    renderer: Arc<dyn MarkdownRenderer>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryKeyValueStore::new()),
            renderer: Arc::new(PlainRenderer),
        }
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn build(self) -> Harness {
        let sink = Arc::new(RecordingSink::default());
        let transport = Arc::new(ScriptedTransport::default());
        let ports = Ports {
            fs: Arc::new(StdFileSystem),
            store: self.store,
            transport: transport.clone(),
            sink: sink.clone(),
            renderer: self.renderer,
            html: Arc::new(crate::adapter::HtmlMarkdownRenderer::new()),
            id_gen: Arc::new(SequencedIds::default()),
            log: Arc::new(NoopLog),
        };
        let app = build_use_case(ports, DocshConfig::default(), DocumentKind::OnePager);
        Harness {
            app,
            sink,
            transport,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::new().build()
}

/// メモリストアを共有するハーネス（再起動を模す）
pub fn harness_with_store(store: Arc<MemoryKeyValueStore>) -> Harness {
    HarnessBuilder::new().store(store).build()
}
