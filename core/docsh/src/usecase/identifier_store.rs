//! Identifier Store: 種別ごとのセッション識別子を発行・永続化する
//!
//! ストアの失敗はここで握りつぶす（DegradingKeyValueStore が先にメモリへ切り替える）。
//! 直近の値は常にメモリにも持つので、ストアが使えなくてもプロセス内では一貫する。

use crate::domain::{DocumentKind, SessionId};
use common::ports::outbound::{IdGenerator, KeyValueStore, Log, LogLevel, LogRecord};
use std::collections::HashMap;
use std::sync::Arc;

pub struct IdentifierStore {
    store: Arc<dyn KeyValueStore>,
    id_gen: Arc<dyn IdGenerator>,
    log: Arc<dyn Log>,
    live: HashMap<DocumentKind, SessionId>,
}

impl IdentifierStore {
    pub fn new(store: Arc<dyn KeyValueStore>, id_gen: Arc<dyn IdGenerator>, log: Arc<dyn Log>) -> Self {
        Self {
            store,
            id_gen,
            log,
            live: HashMap::new(),
        }
    }

    /// 現在の識別子。無ければ発行して保存する。
    pub fn get_or_create(&mut self, kind: DocumentKind) -> SessionId {
        if let Some(id) = self.current(kind) {
            self.live.insert(kind, id.clone());
            return id;
        }
        let id = SessionId::mint(kind, &self.id_gen.next_id());
        self.persist(kind, &id);
        id
    }

    /// 必ず前回と異なる識別子を発行して保存する
    pub fn reset(&mut self, kind: DocumentKind) -> SessionId {
        let previous = self.current(kind);
        let id = loop {
            let candidate = SessionId::mint(kind, &self.id_gen.next_id());
            if previous.as_ref() != Some(&candidate) {
                break candidate;
            }
        };
        self.persist(kind, &id);
        id
    }

    /// 保存済み文書を one-pager に読み込んだとき
    pub fn regenerate_for_loaded(&mut self, kind: DocumentKind) -> SessionId {
        self.reset(kind)
    }

    /// 発行済みの識別子（発行はしない）
    pub fn current(&self, kind: DocumentKind) -> Option<SessionId> {
        if let Some(id) = self.live.get(&kind) {
            return Some(id.clone());
        }
        self.store
            .get(kind.profile().session_key)
            .ok()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .map(SessionId::new)
    }

    fn persist(&mut self, kind: DocumentKind, id: &SessionId) {
        if let Err(e) = self.store.set(kind.profile().session_key, id) {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "failed to persist session id")
                    .layer("usecase")
                    .kind("storage")
                    .field("kind", kind.slug())
                    .field("error", e.to_string()),
            );
        }
        self.live.insert(kind, id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::{MemoryKeyValueStore, NoopLog};
    use common::domain::CorrelationToken;
    use std::sync::Mutex;

    /// 指定した順にトークンを返す（尽きたら最後を繰り返す）
    struct ScriptedIds(Mutex<Vec<&'static str>>);

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> CorrelationToken {
            let mut v = self.0.lock().unwrap();
            let next = if v.len() > 1 { v.remove(0) } else { v[0] };
            CorrelationToken::new(next)
        }
    }

    fn store_with(ids: Vec<&'static str>) -> (IdentifierStore, Arc<MemoryKeyValueStore>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = IdentifierStore::new(
            kv.clone(),
            Arc::new(ScriptedIds(Mutex::new(ids))),
            Arc::new(NoopLog),
        );
        (store, kv)
    }

    #[test]
    fn test_get_or_create_persists_and_reuses() {
        let (mut ids, kv) = store_with(vec!["1_a", "2_b"]);
        let first = ids.get_or_create(DocumentKind::Briefing);
        assert_eq!(first.as_ref(), "briefing_document_1_a");
        assert_eq!(
            kv.get("briefingDocumentId").unwrap().as_deref(),
            Some("briefing_document_1_a")
        );
        assert_eq!(ids.get_or_create(DocumentKind::Briefing), first);
    }

    #[test]
    fn test_get_or_create_reads_persisted_value() {
        let (mut ids, kv) = store_with(vec!["9_z"]);
        kv.set("reportDocumentId", "report_document_old").unwrap();
        assert_eq!(ids.get_or_create(DocumentKind::Report).as_ref(), "report_document_old");
    }

    #[test]
    fn test_reset_skips_colliding_token() {
        let (mut ids, _kv) = store_with(vec!["1_a", "1_a", "1_a", "2_b"]);
        let first = ids.get_or_create(DocumentKind::OnePager);
        let second = ids.reset(DocumentKind::OnePager);
        assert_ne!(first, second);
        assert_eq!(second.as_ref(), "onepager_document_2_b");
        assert_eq!(ids.current(DocumentKind::OnePager), Some(second));
    }

    #[test]
    fn test_current_does_not_mint() {
        let (ids, kv) = store_with(vec!["1_a"]);
        assert_eq!(ids.current(DocumentKind::Briefing), None);
        assert_eq!(kv.get("briefingDocumentId").unwrap(), None);
    }
}
