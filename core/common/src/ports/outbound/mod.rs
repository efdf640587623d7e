//! Outbound ポート: アプリが外界（FS・時刻・環境変数・ストア・webhook・ログ）を使うための trait

pub mod clock;
pub mod env_resolver;
pub mod fs;
pub mod id_generator;
pub mod key_value_store;
pub mod log;
pub mod webhook_transport;

pub use clock::Clock;
pub use env_resolver::EnvResolver;
pub use fs::{FileMetadata, FileSystem};
pub use id_generator::IdGenerator;
pub use key_value_store::KeyValueStore;
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use webhook_transport::{WebhookResponse, WebhookTransport};
