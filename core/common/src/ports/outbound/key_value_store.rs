//! キー・値ストア Outbound ポート
//!
//! ブラウザの localStorage に相当する。値は文字列のみ。
//! 実装が失敗を返した場合の扱い（メモリへの縮退）は DegradingKeyValueStore が担う。

use crate::error::Error;

/// 文字列キー・文字列値の永続ストア
pub trait KeyValueStore: Send + Sync {
    /// 値を取得する。キーが無ければ Ok(None)。
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    /// キーを削除する。存在しなくてもエラーにしない。
    fn remove(&self, key: &str) -> Result<(), Error>;
}
