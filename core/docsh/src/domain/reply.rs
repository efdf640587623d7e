//! 外部ワークフローの応答（構造化）
//!
//! フィールドが無ければ「変更なし」。`<prefix>Content` が空文字または null なら「文書を空にする」。

use crate::domain::DocumentKind;
use common::error::Error;
use serde_json::Value;

const DIAGNOSTIC_MAX_CHARS: usize = 200;

/// 応答から取り出した適用対象
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReply {
    pub chat_reply: Option<String>,
    pub title: Option<String>,
    /// Some("") は明示的な消去
    pub content: Option<String>,
}

impl SyncReply {
    /// 2xx 応答の本文を種別に応じて解釈する
    pub fn parse(kind: DocumentKind, body: &str) -> Result<Self, Error> {
        let v: Value = serde_json::from_str(body)
            .map_err(|e| Error::json(format!("Failed to parse reply JSON: {}", e)))?;
        let obj = v
            .as_object()
            .ok_or_else(|| Error::json("Reply is not a JSON object"))?;

        let prefix = kind.profile().reply_prefix;
        let non_empty_str = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let content = match obj.get(&format!("{}Content", prefix)) {
            None => None,
            Some(Value::Null) => Some(String::new()),
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            chat_reply: non_empty_str("chatReply"),
            title: non_empty_str(&format!("{}Title", prefix)),
            content,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.chat_reply.is_none() && self.title.is_none() && self.content.is_none()
    }
}

/// 非 2xx 応答の本文から診断メッセージを取り出す（`{"message": ...}` を優先）
pub fn diagnostic_text(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    let text = from_json.unwrap_or_else(|| body.trim().to_string());
    let mut out: String = text.chars().take(DIAGNOSTIC_MAX_CHARS).collect();
    if text.chars().count() > DIAGNOSTIC_MAX_CHARS {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_fields_for_briefing() {
        let r = SyncReply::parse(
            DocumentKind::Briefing,
            r###"{"chatReply":"Here you go","briefingTitle":"Exec Brief","briefingContent":"# B"}"###,
        )
        .unwrap();
        assert_eq!(r.chat_reply.as_deref(), Some("Here you go"));
        assert_eq!(r.title.as_deref(), Some("Exec Brief"));
        assert_eq!(r.content.as_deref(), Some("# B"));
    }

    #[test]
    fn test_other_kinds_fields_are_ignored() {
        let r = SyncReply::parse(
            DocumentKind::Report,
            r###"{"onePagerContent":"# wrong","briefingTitle":"x"}"###,
        )
        .unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_absent_vs_explicit_empty_content() {
        let absent = SyncReply::parse(DocumentKind::OnePager, r#"{"chatReply":"hi"}"#).unwrap();
        assert_eq!(absent.content, None);

        let empty = SyncReply::parse(DocumentKind::OnePager, r#"{"onePagerContent":""}"#).unwrap();
        assert_eq!(empty.content.as_deref(), Some(""));

        let null = SyncReply::parse(DocumentKind::OnePager, r#"{"onePagerContent":null}"#).unwrap();
        assert_eq!(null.content.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_chat_reply_is_ignored() {
        let r = SyncReply::parse(DocumentKind::OnePager, r#"{"chatReply":""}"#).unwrap();
        assert_eq!(r.chat_reply, None);
    }

    #[test]
    fn test_non_object_is_json_error() {
        assert!(SyncReply::parse(DocumentKind::OnePager, "[1,2]").is_err());
        assert!(SyncReply::parse(DocumentKind::OnePager, "<html>").is_err());
    }

    #[test]
    fn test_diagnostic_text() {
        assert_eq!(diagnostic_text(r#"{"message":"Workflow failed"}"#), "Workflow failed");
        assert_eq!(diagnostic_text("  Bad Gateway \n"), "Bad Gateway");
        let long = "x".repeat(300);
        let d = diagnostic_text(&long);
        assert!(d.ends_with("..."));
        assert_eq!(d.chars().count(), DIAGNOSTIC_MAX_CHARS + 3);
    }
}
