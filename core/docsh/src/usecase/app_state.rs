//! アプリケーション状態（グローバルを持たず View Controller が所有する）

use crate::domain::{DocumentKind, ViewMode};
use crate::usecase::document_cache::DocumentCache;
use crate::usecase::identifier_store::IdentifierStore;
use crate::usecase::transcript_log::TranscriptLog;
use std::collections::{HashMap, HashSet};

pub struct AppState {
    pub active: DocumentKind,
    pub modes: HashMap<DocumentKind, ViewMode>,
    /// 送信中の種別（種別ごとに同時 1 件まで）
    pub busy: HashSet<DocumentKind>,
    pub identifiers: IdentifierStore,
    pub documents: DocumentCache,
    pub transcripts: TranscriptLog,
}

impl AppState {
    pub fn new(
        initial: DocumentKind,
        identifiers: IdentifierStore,
        documents: DocumentCache,
        transcripts: TranscriptLog,
    ) -> Self {
        Self {
            active: initial,
            modes: HashMap::new(),
            busy: HashSet::new(),
            identifiers,
            documents,
            transcripts,
        }
    }

    pub fn mode(&self, kind: DocumentKind) -> ViewMode {
        self.modes.get(&kind).copied().unwrap_or(ViewMode::Chat)
    }

    pub fn is_busy(&self, kind: DocumentKind) -> bool {
        self.busy.contains(&kind)
    }
}
