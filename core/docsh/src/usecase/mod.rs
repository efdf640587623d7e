//! ユースケース層: 状態管理（識別子・文書・チャット・表示）と外部ワークフローとの同期

pub mod app;
pub mod app_state;
pub mod document_cache;
pub mod identifier_store;
pub mod library;
pub mod remote_sync;
pub mod transcript_log;
pub mod view_controller;
