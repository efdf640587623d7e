//! 端末への表示（ViewEvent を行単位のテキストにする）

use crate::domain::{DocumentDisplay, Speaker, ViewEvent, ViewMode};
use crate::ports::outbound::ViewSink;
use common::error::Error;
use std::io::{self, Write};
use std::sync::Mutex;

pub struct TerminalViewSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalViewSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

/// 1 イベント分の表示テキスト。何も出さないイベントは None。
pub fn format_event(event: &ViewEvent) -> Option<String> {
    let label = event.kind().label();
    match event {
        ViewEvent::Activated { mode, .. } => {
            let mut s = format!("\n── {} ──", label);
            if *mode == ViewMode::SourceInput {
                s.push_str("\n(source needed: /source <file>, or /view onepager to write one)");
            }
            Some(s)
        }
        ViewEvent::DocumentShown { display, .. } => Some(match display {
            DocumentDisplay::Rendered(text) | DocumentDisplay::Raw(text) => format!("\n{}\n", text),
            DocumentDisplay::Placeholder(text) => format!("  ({})", text),
        }),
        ViewEvent::TitleShown { title, .. } => Some(format!("[{}] {}", label, title)),
        ViewEvent::SourceShown { preview, .. } => Some(format!("Source: {}", preview)),
        ViewEvent::ChatAppended { turn, .. } => Some(match turn.speaker {
            Speaker::User => format!("you> {}", turn.text),
            Speaker::Assistant => format!("{}> {}", label, turn.text),
        }),
        ViewEvent::ChatCleared { .. } => None,
        ViewEvent::InputBusy { busy: true, .. } => {
            Some(format!("… waiting for {} assistant", label))
        }
        ViewEvent::InputBusy { busy: false, .. } => None,
        ViewEvent::Notice { text, .. } => Some(text.clone()),
    }
}

impl ViewSink for TerminalViewSink {
    fn emit(&self, event: &ViewEvent) -> Result<(), Error> {
        let Some(text) = format_event(event) else {
            return Ok(());
        };
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::system("terminal output lock poisoned"))?;
        writeln!(out, "{}", text)
            .and_then(|_| out.flush())
            .map_err(|e| Error::io_msg(format!("Failed to write to terminal: {}", e)))
    }
}
