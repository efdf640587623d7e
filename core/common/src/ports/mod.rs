//! docsh 共通の外界ポート
//!
//! common はアプリの入り口を持たないので outbound のみ。
//! webhook 送信・キー/値の永続化・JSONL ログ・時刻・ID 生成・FS・環境変数を trait として切り出す。

pub mod outbound;
