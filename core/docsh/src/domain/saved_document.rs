//! 保存済み one-pager（文書ライブラリの一覧要素）

use serde::Deserialize;

/// 一覧 API の 1 件。`DocumentID` / `id` どちらの綴りも受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedDocument {
    #[serde(alias = "DocumentID", alias = "documentId")]
    pub id: String,
    #[serde(default, alias = "DocumentName")]
    pub name: Option<String>,
    #[serde(default, alias = "SavedAt", alias = "savedAt")]
    pub saved_at: Option<String>,
    #[serde(default, alias = "Content")]
    pub content: Option<String>,
}

impl SavedDocument {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Untitled Document")
    }

    /// 保存日時の表示（RFC3339 ならローカル形式、解釈できなければそのまま、無ければ N/A）
    pub fn display_saved_at(&self) -> String {
        match self.saved_at.as_deref() {
            None | Some("") => "N/A".to_string(),
            Some(s) => match chrono::DateTime::parse_from_rfc3339(s) {
                Ok(dt) => dt
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                Err(_) => s.to_string(),
            },
        }
    }

    /// 一覧に本文が含まれていれば返す
    pub fn inline_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_capitalized_fields() {
        let docs: Vec<SavedDocument> = serde_json::from_str(
            r##"[{"DocumentID":"d1","DocumentName":"Plan","SavedAt":"2026-05-01T10:00:00Z","Content":"# Plan"}]"##,
        )
        .unwrap();
        assert_eq!(docs[0].id, "d1");
        assert_eq!(docs[0].display_name(), "Plan");
        assert_eq!(docs[0].inline_content(), Some("# Plan"));
    }

    #[test]
    fn test_deserialize_lowercase_and_missing_fields() {
        let docs: Vec<SavedDocument> =
            serde_json::from_str(r#"[{"id":"d2"},{"id":"d3","name":"","saved_at":"yesterday"}]"#)
                .unwrap();
        assert_eq!(docs[0].display_name(), "Untitled Document");
        assert_eq!(docs[0].display_saved_at(), "N/A");
        assert_eq!(docs[0].inline_content(), None);
        assert_eq!(docs[1].display_name(), "Untitled Document");
        assert_eq!(docs[1].display_saved_at(), "yesterday");
    }
}
