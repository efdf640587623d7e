//! Outbound ポート: 表示と Markdown 描画
//!
//! 永続化・webhook・ログ・ID 生成は common::ports::outbound を使う。

pub mod markdown_renderer;
pub mod view_sink;

pub use markdown_renderer::MarkdownRenderer;
pub use view_sink::ViewSink;
