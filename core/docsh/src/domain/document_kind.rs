//! 文書種別（one-pager / briefing / report）
//!
//! 種別ごとの差分（送信先・生成元の要否・応答フィールド名・保存キー）は KindProfile に集約し、
//! チャット駆動の文書処理は 1 つの汎用実装で 3 種別を扱う。

use common::error::Error;
use std::str::FromStr;

/// 文書種別。実行時に増えることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    OnePager,
    Briefing,
    Report,
}

/// 生成元（one-pager 本文）の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRule {
    /// 生成元を送らない
    NotUsed,
    /// 生成元が無ければ送信せずローカルで拒否する
    Required,
    /// あれば送り、無ければ null を送る
    Optional,
}

/// 種別ごとの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindProfile {
    pub kind: DocumentKind,
    /// 設定ファイルの endpoints で上書きするときの名前
    pub endpoint_name: &'static str,
    pub default_endpoint: &'static str,
    pub source_rule: SourceRule,
    /// リクエストで生成元を載せるフィールド名
    pub source_field: Option<&'static str>,
    /// 応答の `<prefix>Title` / `<prefix>Content` の prefix
    pub reply_prefix: &'static str,
    pub placeholder: &'static str,
    pub default_title: Option<&'static str>,
    pub content_key: &'static str,
    pub title_key: &'static str,
    pub session_key: &'static str,
    /// ユーザーが明示的に読み込んだ生成元の保存キー
    pub source_override_key: Option<&'static str>,
}

const ONE_PAGER: KindProfile = KindProfile {
    kind: DocumentKind::OnePager,
    endpoint_name: "onepager_message",
    default_endpoint: "one-pager/message",
    source_rule: SourceRule::NotUsed,
    source_field: None,
    reply_prefix: "onePager",
    placeholder: "Content will appear here...",
    default_title: None,
    content_key: "onePagerActiveContent",
    title_key: "onepagerTitle",
    session_key: "onepagerDocumentId",
    source_override_key: None,
};

const BRIEFING: KindProfile = KindProfile {
    kind: DocumentKind::Briefing,
    endpoint_name: "briefing_message",
    default_endpoint: "briefing/message",
    source_rule: SourceRule::Required,
    source_field: Some("originalOnePagerContent"),
    reply_prefix: "briefing",
    placeholder: "Briefing will appear here...",
    default_title: Some("Generated Briefing"),
    content_key: "briefingActiveContent",
    title_key: "briefingTitle",
    session_key: "briefingDocumentId",
    source_override_key: Some("briefingOriginalOnePager"),
};

const REPORT: KindProfile = KindProfile {
    kind: DocumentKind::Report,
    endpoint_name: "report_message",
    default_endpoint: "report/message",
    source_rule: SourceRule::Optional,
    source_field: Some("onePagerSourceContent"),
    reply_prefix: "report",
    placeholder: "Your generated report will appear here...",
    default_title: Some("Generated Report"),
    content_key: "reportActiveContent",
    title_key: "reportTitle",
    session_key: "reportDocumentId",
    source_override_key: Some("reportSourceOverride"),
};

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::OnePager,
        DocumentKind::Briefing,
        DocumentKind::Report,
    ];

    /// 保存キー・識別子・URL フラグメントに使う名前
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::OnePager => "onepager",
            DocumentKind::Briefing => "briefing",
            DocumentKind::Report => "report",
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::OnePager => "One Pager",
            DocumentKind::Briefing => "Briefing",
            DocumentKind::Report => "Report",
        }
    }

    pub fn profile(&self) -> &'static KindProfile {
        match self {
            DocumentKind::OnePager => &ONE_PAGER,
            DocumentKind::Briefing => &BRIEFING,
            DocumentKind::Report => &REPORT,
        }
    }

    /// `onepager` / `one-pager` / `#briefing` などを受け付ける
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#').to_ascii_lowercase();
        match s.as_str() {
            "onepager" | "one-pager" | "one_pager" => Some(DocumentKind::OnePager),
            "briefing" => Some(DocumentKind::Briefing),
            "report" => Some(DocumentKind::Report),
            _ => None,
        }
    }

    /// URL フラグメント相当から初期表示を決める。有効な種別でなければ one-pager。
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        fragment
            .and_then(DocumentKind::parse)
            .unwrap_or(DocumentKind::OnePager)
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::parse(s).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Unknown document kind '{}' (expected onepager, briefing or report)",
                s
            ))
        })
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
