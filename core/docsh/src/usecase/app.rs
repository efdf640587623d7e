//! docsh のユースケース（対話・ワンショットの両方から使う）
//!
//! 状態（ViewController）はこの構造体を持つスレッドだけが触る。
//! 送信は worker スレッドで行い、結果は channel で戻して drain で反映する。

use crate::domain::{DocumentKind, ReplCommand, SavedDocument, Speaker};
use crate::ports::outbound::MarkdownRenderer;
use crate::usecase::library::{DocumentLibrary, LibraryError};
use crate::usecase::remote_sync::{Echo, PendingSync, RemoteSync, SyncOutcome, SyncRejected};
use crate::usecase::view_controller::ViewController;
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord, WebhookResponse};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

type Completed = (PendingSync, Result<WebhookResponse, Error>);

/// 1 コマンド処理後にループを続けるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct DocshUseCase {
    controller: ViewController,
    sync: RemoteSync,
    library: DocumentLibrary,
    fs: Arc<dyn FileSystem>,
    html: Arc<dyn MarkdownRenderer>,
    log: Arc<dyn Log>,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    in_flight: usize,
    /// 直近の /docs の結果（/open <n> で参照する）
    listing: Vec<SavedDocument>,
}

impl DocshUseCase {
    pub fn new(
        controller: ViewController,
        sync: RemoteSync,
        library: DocumentLibrary,
        fs: Arc<dyn FileSystem>,
        html: Arc<dyn MarkdownRenderer>,
        log: Arc<dyn Log>,
    ) -> Self {
        let (tx, rx) = channel();
        Self {
            controller,
            sync,
            library,
            fs,
            html,
            log,
            tx,
            rx,
            in_flight: 0,
            listing: Vec::new(),
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewController {
        &mut self.controller
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// 対話モードの 1 行を処理する
    pub fn execute(&mut self, cmd: ReplCommand) -> Result<Flow, Error> {
        let active = self.controller.active();
        match cmd {
            ReplCommand::Refresh => {}
            ReplCommand::Send(text) => self.submit(active, &text, Echo::Shown),
            ReplCommand::View(kind) => self.controller.activate(kind),
            ReplCommand::New => {
                self.controller.reset(active);
                if active == DocumentKind::OnePager {
                    self.submit(active, "start", Echo::Hidden);
                }
            }
            ReplCommand::Reset(kind) => self.controller.reset(kind.unwrap_or(active)),
            ReplCommand::Source(path) => {
                let content = self.fs.read_to_string(&path)?;
                self.controller.load_source(active, &content)?;
            }
            ReplCommand::Show => self.controller.show(active),
            ReplCommand::Copy(path) => self.copy(active, path.as_deref())?,
            ReplCommand::Html(path) => self.export_html(active, path.as_deref())?,
            ReplCommand::Save(name) => {
                let _ = self.library.save(&mut self.controller, &name);
            }
            ReplCommand::Docs => {
                if let Err(e) = self.list_documents() {
                    self.controller.notice(format!("Could not fetch documents: {}", e));
                }
            }
            ReplCommand::Open(selector) => {
                if let Err(e) = self.open_document(&selector) {
                    if e != LibraryError::NoContent {
                        self.controller.notice(format!("Could not open document: {}", e));
                    }
                }
            }
            ReplCommand::History => self.history(active),
            ReplCommand::Help => self.controller.notice(repl_help()),
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// 入力を送る。通信は worker スレッドで行う。
    pub fn submit(&mut self, kind: DocumentKind, input: &str, echo: Echo) {
        let pending = match self.sync.begin(&mut self.controller, kind, input, echo) {
            Ok(p) => p,
            Err(SyncRejected::EmptyInput) | Err(SyncRejected::MissingSource(_)) => return,
            Err(e @ SyncRejected::Busy(_)) => {
                self.controller.notice(format!("{}. Please wait.", e));
                return;
            }
        };
        let sync = self.sync.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let result = sync.dispatch(&pending);
            let _ = tx.send((pending, result));
        });
    }

    /// 届いている応答をすべて反映する（ブロックしない）
    pub fn drain(&mut self) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::new();
        while let Ok((pending, result)) = self.rx.try_recv() {
            outcomes.push(self.complete(pending, result));
        }
        outcomes
    }

    /// 送信中の応答がすべて届くまで待って反映する
    pub fn wait_idle(&mut self) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::new();
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok((pending, result)) => outcomes.push(self.complete(pending, result)),
                Err(_) => break,
            }
        }
        outcomes
    }

    /// 1 回だけ送って応答を反映する（ワンショット用）
    pub fn send_once(&mut self, kind: DocumentKind, text: &str) -> Result<SyncOutcome, SyncRejected> {
        self.controller.activate(kind);
        self.sync.send(&mut self.controller, kind, text, Echo::Shown)
    }

    pub fn list_documents(&mut self) -> Result<&[SavedDocument], LibraryError> {
        let docs = self.library.list()?;
        if docs.is_empty() {
            self.controller.notice("No saved documents found.");
        } else {
            let lines: Vec<String> = docs
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    format!(
                        "{:>3}. {}  (Saved: {})  [{}]",
                        i + 1,
                        d.display_name(),
                        d.display_saved_at(),
                        d.id
                    )
                })
                .collect();
            self.controller.notice(lines.join("\n"));
        }
        self.listing = docs;
        Ok(self.listing.as_slice())
    }

    /// 一覧の番号（1 始まり）または文書 ID で開く
    pub fn open_document(&mut self, selector: &str) -> Result<(), LibraryError> {
        let selector = selector.trim();
        let by_index = selector
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.listing.get(i).cloned());
        let doc = by_index
            .or_else(|| self.listing.iter().find(|d| d.id == selector).cloned())
            .unwrap_or_else(|| SavedDocument {
                id: selector.to_string(),
                name: None,
                saved_at: None,
                content: None,
            });
        self.library.open(&mut self.controller, &doc)
    }

    pub fn save(&mut self, name: &str) -> Result<String, LibraryError> {
        self.library.save(&mut self.controller, name)
    }

    fn complete(&mut self, pending: PendingSync, result: Result<WebhookResponse, Error>) -> SyncOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.sync.complete(&mut self.controller, pending, result)
    }

    fn copy(&mut self, kind: DocumentKind, path: Option<&Path>) -> Result<(), Error> {
        let raw = self.controller.current_raw(kind);
        if raw.trim().is_empty() {
            self.controller.notice("Nothing to copy.");
            return Ok(());
        }
        match path {
            Some(p) => {
                self.fs.write(p, &raw)?;
                self.controller
                    .notice(format!("Copied {} Markdown to {}", kind.label(), p.display()));
            }
            None => self.controller.notice(raw),
        }
        Ok(())
    }

    fn export_html(&mut self, kind: DocumentKind, path: Option<&Path>) -> Result<(), Error> {
        let raw = self.controller.current_raw(kind);
        if raw.trim().is_empty() {
            self.controller.notice("Nothing to export.");
            return Ok(());
        }
        let html = self.html.render(&raw)?;
        match path {
            Some(p) => {
                self.fs.write(p, &html)?;
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Info, "html exported")
                        .layer("usecase")
                        .kind("export")
                        .field("kind", kind.slug())
                        .field("path", p.display().to_string()),
                );
                self.controller
                    .notice(format!("Wrote {} HTML to {}", kind.label(), p.display()));
            }
            None => self.controller.notice(html),
        }
        Ok(())
    }

    fn history(&self, kind: DocumentKind) {
        let turns = self.controller.transcript(kind);
        if turns.is_empty() {
            self.controller.notice("No messages yet.");
            return;
        }
        let lines: Vec<String> = turns
            .iter()
            .map(|t| {
                let who = match t.speaker {
                    Speaker::User => "you",
                    Speaker::Assistant => "assistant",
                };
                format!("{}: {}", who, t.text)
            })
            .collect();
        self.controller.notice(lines.join("\n"));
    }
}

pub fn repl_help() -> String {
    [
        "Type a message to send it to the current assistant.",
        "Commands:",
        "  /view <onepager|briefing|report>  Switch the active document",
        "  /new                              Start over (one-pager: asks the assistant to begin)",
        "  /reset [kind]                     Clear a document, its chat and its session",
        "  /source <file>                    Load a source document for briefing/report",
        "  /show                             Show the current document again",
        "  /copy [file]                      Print or write the current Markdown",
        "  /html [file]                      Print or write the current document as HTML",
        "  /save <name>                      Save the one-pager",
        "  /docs                             List saved documents",
        "  /open <number|id>                 Load a saved document into the one-pager",
        "  /history                          Show this view's chat",
        "  /help                             Show this help",
        "  /quit                             Exit",
    ]
    .join("\n")
}
