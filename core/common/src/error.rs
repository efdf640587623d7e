//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。CLI では `exit_code()` を終了コードとして使う。

/// docsh 共通のエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正・使い方の誤り（終了コード 64）
    #[error("{0}")]
    InvalidArgument(String),
    /// ファイル I/O（終了コード 74）
    #[error("{0}")]
    Io(String),
    /// HTTP 通信（終了コード 74）
    #[error("{0}")]
    Http(String),
    /// JSON の解析・生成（終了コード 65）
    #[error("{0}")]
    Json(String),
    /// 環境変数・設定（終了コード 78）
    #[error("{0}")]
    Env(String),
    /// その他のシステムエラー（終了コード 70）
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Error::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// sysexits.h に準じた終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::Json(_) => 65,
            Error::System(_) => 70,
            Error::Io(_) | Error::Http(_) => 74,
            Error::Env(_) => 78,
        }
    }

    /// usage を併せて表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
