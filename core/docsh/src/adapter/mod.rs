//! docsh のアダプター（設定・Markdown 描画・端末表示）

pub(crate) mod config;
pub(crate) mod markdown;
pub(crate) mod terminal_view_sink;

pub(crate) use config::{load_config, CliOverrides};
pub(crate) use markdown::{HtmlMarkdownRenderer, TerminalMarkdownRenderer};
pub(crate) use terminal_view_sink::TerminalViewSink;
