//! Transcript Log: 種別ごとのチャット履歴（メモリのみ）

use crate::domain::{ChatTurn, DocumentKind, ViewEvent};
use crate::ports::outbound::ViewSink;
use std::collections::HashMap;
use std::sync::Arc;

pub struct TranscriptLog {
    sink: Arc<dyn ViewSink>,
    turns: HashMap<DocumentKind, Vec<ChatTurn>>,
}

impl TranscriptLog {
    pub fn new(sink: Arc<dyn ViewSink>) -> Self {
        Self {
            sink,
            turns: HashMap::new(),
        }
    }

    pub fn append(&mut self, kind: DocumentKind, turn: ChatTurn) {
        let _ = self.sink.emit(&ViewEvent::ChatAppended {
            kind,
            turn: turn.clone(),
        });
        self.turns.entry(kind).or_default().push(turn);
    }

    pub fn clear(&mut self, kind: DocumentKind) {
        self.turns.remove(&kind);
        let _ = self.sink.emit(&ViewEvent::ChatCleared { kind });
    }

    pub fn turns(&self, kind: DocumentKind) -> &[ChatTurn] {
        self.turns.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self, kind: DocumentKind) -> bool {
        self.turns(kind).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Speaker;
    use common::error::Error;

    struct Silent;
    impl ViewSink for Silent {
        fn emit(&self, _event: &ViewEvent) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_append_is_per_kind_and_ordered() {
        let mut log = TranscriptLog::new(Arc::new(Silent));
        log.append(DocumentKind::OnePager, ChatTurn::user("start"));
        log.append(DocumentKind::OnePager, ChatTurn::assistant("What is the project?"));
        log.append(DocumentKind::Report, ChatTurn::user("Q3"));

        let turns = log.turns(DocumentKind::OnePager);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[1].text, "What is the project?");
        assert_eq!(log.turns(DocumentKind::Report).len(), 1);
        assert!(log.is_empty(DocumentKind::Briefing));

        log.clear(DocumentKind::OnePager);
        assert!(log.is_empty(DocumentKind::OnePager));
        assert_eq!(log.turns(DocumentKind::Report).len(), 1);
    }
}
