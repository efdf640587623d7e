//! Markdown 描画 Outbound ポート

use common::error::Error;

/// Markdown を表示用の文字列に変換する。失敗時は呼び出し側が生テキストで代替する。
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, Error>;
}
