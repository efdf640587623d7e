//! 画面の状態と、View Controller が発行する表示イベント

use crate::domain::{ChatTurn, DocumentDisplay, DocumentKind};

/// 種別ごとの表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// チャットと文書を表示する通常の画面
    Chat,
    /// 生成元の入力を求める画面（briefing で生成元が無いとき）
    SourceInput,
}

/// 表示側（ViewSink）へ通知するイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Activated {
        kind: DocumentKind,
        mode: ViewMode,
    },
    DocumentShown {
        kind: DocumentKind,
        display: DocumentDisplay,
    },
    TitleShown {
        kind: DocumentKind,
        title: String,
    },
    /// 生成元として使う文書の抜粋
    SourceShown {
        kind: DocumentKind,
        preview: String,
    },
    ChatAppended {
        kind: DocumentKind,
        turn: ChatTurn,
    },
    ChatCleared {
        kind: DocumentKind,
    },
    /// 送信中は入力を受け付けない
    InputBusy {
        kind: DocumentKind,
        busy: bool,
    },
    /// チャットに残さない案内（一覧・ヘルプ・書き出し結果など）
    Notice {
        kind: DocumentKind,
        text: String,
    },
}

impl ViewEvent {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ViewEvent::Activated { kind, .. }
            | ViewEvent::DocumentShown { kind, .. }
            | ViewEvent::TitleShown { kind, .. }
            | ViewEvent::SourceShown { kind, .. }
            | ViewEvent::ChatAppended { kind, .. }
            | ViewEvent::ChatCleared { kind }
            | ViewEvent::InputBusy { kind, .. }
            | ViewEvent::Notice { kind, .. } => *kind,
        }
    }
}
