//! アダプター（Outbound ポートの標準実装）
//!
//! usecase はポートの trait 経由でのみファイル・時刻・環境変数・ストア・webhook に触れる。
//! 実装は標準実装（Std*）やテスト用のモックを注入する。

pub mod degrading_kv_store;
pub mod file_json_log;
pub mod file_kv_store;
pub mod memory_kv_store;
pub mod reqwest_webhook;
pub mod std_clock;
pub mod std_env_resolver;
pub mod std_fs;
pub mod std_id_generator;

pub use crate::ports::outbound::{
    Clock, EnvResolver, FileMetadata, FileSystem, IdGenerator, KeyValueStore, Log,
    WebhookTransport,
};
pub use degrading_kv_store::DegradingKeyValueStore;
pub use file_json_log::{FileJsonLog, NoopLog, StderrMirrorLog};
pub use file_kv_store::FileKeyValueStore;
pub use memory_kv_store::MemoryKeyValueStore;
pub use reqwest_webhook::ReqwestWebhookTransport;
pub use std_clock::StdClock;
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
pub use std_id_generator::StdIdGenerator;
