//! セッション識別子（外部ワークフローが会話メモリを紐づける相関キー）

use crate::domain::DocumentKind;
use common::domain::CorrelationToken;

/// `<slug>_document_<unix_ms>_<base36>` 形式の不透明な文字列
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// 種別名を前置して識別子を作る
    pub fn mint(kind: DocumentKind, token: &CorrelationToken) -> Self {
        Self(format!("{}_document_{}", kind.slug(), token))
    }
}

impl std::ops::Deref for SessionId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_prefixes_slug() {
        let id = SessionId::mint(
            DocumentKind::Briefing,
            &CorrelationToken::new("1700000000000_abc"),
        );
        assert_eq!(&*id, "briefing_document_1700000000000_abc");
    }
}
