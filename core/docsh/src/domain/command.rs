//! docsh コマンドの enum（Command Pattern）
//!
//! CLI の実行モード（DocshCommand）と、対話モード内の 1 行入力（ReplCommand）。

use crate::domain::DocumentKind;
use common::error::Error;
use std::path::PathBuf;

/// docsh の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum DocshCommand {
    Help,
    /// 対話モード（既定）
    Repl { view: DocumentKind },
    /// 1 回だけ送信して応答を表示する
    Send { kind: DocumentKind, text: String },
    /// 保存済みの文書を表示する
    Show { kind: DocumentKind },
    /// 種別の識別子・文書を初期化する
    Reset { kind: DocumentKind },
    /// 保存済み文書の一覧
    Docs,
    /// 保存済み文書を one-pager に読み込む
    Open { id: String },
    /// 現在の one-pager を名前を付けて保存する
    Save { name: String },
}

/// 対話モードの 1 行
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// 空行（届いた応答の反映だけ行う）
    Refresh,
    /// 現在の種別へ送信する本文
    Send(String),
    View(DocumentKind),
    New,
    Reset(Option<DocumentKind>),
    Source(PathBuf),
    Show,
    Copy(Option<PathBuf>),
    Html(Option<PathBuf>),
    Save(String),
    Docs,
    Open(String),
    History,
    Help,
    Quit,
}

impl ReplCommand {
    /// `/` で始まる行はコマンド、それ以外は送信本文として解釈する
    pub fn parse(line: &str) -> Result<Self, Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ReplCommand::Refresh);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(ReplCommand::Send(line.to_string()));
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (rest, ""),
        };
        let arg_opt = (!arg.is_empty()).then(|| arg.to_string());

        match name {
            "view" | "v" => {
                let kind = arg
                    .parse::<DocumentKind>()
                    .map_err(|_| Error::invalid_argument("Usage: /view <onepager|briefing|report>"))?;
                Ok(ReplCommand::View(kind))
            }
            "new" => Ok(ReplCommand::New),
            "reset" => match arg_opt {
                None => Ok(ReplCommand::Reset(None)),
                Some(a) => Ok(ReplCommand::Reset(Some(a.parse()?))),
            },
            "source" => arg_opt
                .map(|a| ReplCommand::Source(PathBuf::from(a)))
                .ok_or_else(|| Error::invalid_argument("Usage: /source <file>")),
            "show" => Ok(ReplCommand::Show),
            "copy" => Ok(ReplCommand::Copy(arg_opt.map(PathBuf::from))),
            "html" => Ok(ReplCommand::Html(arg_opt.map(PathBuf::from))),
            "save" => arg_opt
                .map(ReplCommand::Save)
                .ok_or_else(|| Error::invalid_argument("Usage: /save <name>")),
            "docs" => Ok(ReplCommand::Docs),
            "open" => arg_opt
                .map(ReplCommand::Open)
                .ok_or_else(|| Error::invalid_argument("Usage: /open <number|id>")),
            "history" => Ok(ReplCommand::History),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
            other => Err(Error::invalid_argument(format!(
                "Unknown command '/{}'. Type /help for the list.",
                other
            ))),
        }
    }
}
