//! 実行時ディレクトリ（XDG / DOCSH_HOME 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、設定・保存状態・ログのパス計算に使う。

use std::path::PathBuf;

const CONFIG_FILENAME: &str = "docsh.json";
const STORAGE_FILENAME: &str = "storage.json";
const LOG_FILENAME: &str = "docsh.log.jsonl";

/// 解決済みの config / state ディレクトリ
#[derive(Debug, Clone)]
pub struct Dirs {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Dirs {
    /// 設定ファイル（config/docsh.json）
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILENAME)
    }

    /// キー・値ストアのファイル（state/storage.json）
    pub fn storage_file(&self) -> PathBuf {
        self.state_dir.join(STORAGE_FILENAME)
    }

    /// 構造化ログ（state/docsh.log.jsonl）
    pub fn log_file(&self) -> PathBuf {
        self.state_dir.join(LOG_FILENAME)
    }
}
