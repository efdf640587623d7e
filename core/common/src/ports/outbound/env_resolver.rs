//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリ・実行時ディレクトリ・設定の上書き値を環境変数から解決する。
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::{Dirs, HomeDir};
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. DOCSH_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/docsh（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/docsh
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// config / state ディレクトリ（いずれもホーム配下）
    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        let home = self.resolve_home_dir()?;
        Ok(Dirs {
            config_dir: home.join("config"),
            state_dir: home.join("state"),
        })
    }

    /// DOCSH_WEBHOOK_BASE（webhook のベース URL の上書き）
    fn webhook_base_override(&self) -> Option<String>;

    /// DOCSH_USER_ID（保存・一覧で送る userId の上書き）
    fn user_id_override(&self) -> Option<String>;

    /// DOCSH_TIMEOUT_SECS（リクエストのタイムアウト秒の上書き）
    fn timeout_secs_override(&self) -> Option<u64>;
}
