//! docsh 固有のドメイン型（型と不変条件）

pub mod command;
pub mod config;
pub mod document;
pub mod document_kind;
pub mod reply;
pub mod saved_document;
pub mod session_id;
pub mod transcript;
pub mod view;

pub use command::{DocshCommand, ReplCommand};
pub use config::{DocshConfig, Endpoint};
pub use document::{title_snippet, DocumentDisplay, DocumentRecord};
pub use document_kind::{DocumentKind, SourceRule};
pub use reply::{diagnostic_text, SyncReply};
pub use saved_document::SavedDocument;
pub use session_id::SessionId;
pub use transcript::{ChatTurn, Speaker};
pub use view::{ViewEvent, ViewMode};
