//! 文書レコード（種別ごとの最新 Markdown とタイトル）

use crate::domain::DocumentKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub kind: DocumentKind,
    pub content: String,
    pub title: Option<String>,
}

impl DocumentRecord {
    pub fn new(kind: DocumentKind, content: impl Into<String>, title: Option<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            title,
        }
    }

    /// 本文が空白のみなら空とみなす
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// 文書表示領域に出す内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentDisplay {
    /// 描画済みテキスト
    Rendered(String),
    /// 描画に失敗したため生の Markdown をそのまま出す
    Raw(String),
    /// 本文が空のときの案内文
    Placeholder(&'static str),
}

/// 先頭行から見出し記号を除いた短い抜粋（report の案内文用）
pub fn title_snippet(markdown: &str, max_chars: usize) -> String {
    let first = markdown
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    first
        .trim_start_matches('#')
        .trim_start()
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(DocumentRecord::new(DocumentKind::OnePager, "  \n", None).is_empty());
        assert!(!DocumentRecord::new(DocumentKind::OnePager, "# x", None).is_empty());
    }

    #[test]
    fn test_title_snippet() {
        assert_eq!(title_snippet("## Project Phoenix\nbody", 30), "Project Phoenix");
        assert_eq!(title_snippet("\n\n# A", 30), "A");
        assert_eq!(
            title_snippet("# A very long heading that keeps going on", 10),
            "A very lon"
        );
        assert_eq!(title_snippet("", 30), "");
    }
}
