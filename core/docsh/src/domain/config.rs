//! 実行時設定（webhook の送信先・ユーザー ID・タイムアウト）

use crate::domain::DocumentKind;
use common::domain::BaseUrl;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5678/webhook";
pub const DEFAULT_USER_ID: &str = "default";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// webhook の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// 種別ごとのチャット送信
    Message(DocumentKind),
    /// one-pager の保存
    Save,
    /// 保存済み文書の一覧
    List,
    /// 保存済み文書 1 件の取得
    Get,
}

impl Endpoint {
    /// 設定ファイルの endpoints で使う名前
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Message(kind) => kind.profile().endpoint_name,
            Endpoint::Save => "save",
            Endpoint::List => "list",
            Endpoint::Get => "get",
        }
    }

    pub fn default_path(&self) -> &'static str {
        match self {
            Endpoint::Message(kind) => kind.profile().default_endpoint,
            Endpoint::Save => "one-pager/save",
            Endpoint::List => "mydocuments",
            Endpoint::Get => "mydocument",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocshConfig {
    pub base_url: BaseUrl,
    pub user_id: String,
    pub timeout: Duration,
    /// endpoint 名 → パスまたは絶対 URL
    pub endpoint_overrides: BTreeMap<String, String>,
}

impl Default for DocshConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::new(DEFAULT_BASE_URL),
            user_id: DEFAULT_USER_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            endpoint_overrides: BTreeMap::new(),
        }
    }
}

impl DocshConfig {
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        let path = self
            .endpoint_overrides
            .get(endpoint.name())
            .map(String::as_str)
            .unwrap_or_else(|| endpoint.default_path());
        self.base_url.join(path)
    }
}
