use super::support::{harness, BreakableStore, FailingStore, HarnessBuilder};
use crate::domain::{DocumentKind, ReplCommand, Speaker, ViewMode};
use crate::repl;
use crate::usecase::app::Flow;
use common::adapter::{DegradingKeyValueStore, NoopLog};
use common::ports::outbound::KeyValueStore;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[test]
fn test_new_on_one_pager_sends_hidden_start() {
    let mut h = harness();
    h.transport.push_ok(200, r#"{"chatReply":"What is the project?"}"#);
    h.app.controller_mut().activate(DocumentKind::OnePager);
    let before = h.app.controller().session_id(DocumentKind::OnePager).unwrap();

    assert_eq!(h.app.execute(ReplCommand::New).unwrap(), Flow::Continue);
    h.app.wait_idle();

    let (_, payload) = &h.transport.calls()[0];
    assert_eq!(payload["userInput"], json!("start"));
    let vc = h.app.controller();
    assert_ne!(vc.session_id(DocumentKind::OnePager).unwrap(), before);
    let turns = vc.transcript(DocumentKind::OnePager);
    assert!(turns.iter().all(|t| t.speaker == Speaker::Assistant));
    assert_eq!(turns.last().unwrap().text, "What is the project?");
}

#[test]
fn test_new_on_report_only_resets() {
    let mut h = harness();
    h.app.execute(ReplCommand::View(DocumentKind::Report)).unwrap();
    h.app.execute(ReplCommand::New).unwrap();
    h.app.wait_idle();
    assert_eq!(h.transport.call_count(), 0);
    assert_eq!(h.app.controller().active(), DocumentKind::Report);
}

#[test]
fn test_copy_and_html_export() {
    let tmp = tempfile::tempdir().unwrap();
    let mut h = harness();
    h.app.execute(ReplCommand::Copy(None)).unwrap();
    assert!(h.sink.notices().contains(&"Nothing to copy.".to_string()));

    h.transport.push_ok(200, r###"{"onePagerContent":"# Phoenix\n\n*fast*"}"###);
    h.app.execute(ReplCommand::Send("start".to_string())).unwrap();
    h.app.wait_idle();

    let md_path = tmp.path().join("one.md");
    let html_path = tmp.path().join("one.html");
    h.app.execute(ReplCommand::Copy(Some(md_path.clone()))).unwrap();
    h.app.execute(ReplCommand::Html(Some(html_path.clone()))).unwrap();
    assert_eq!(std::fs::read_to_string(&md_path).unwrap(), "# Phoenix\n\n*fast*");
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<h1>Phoenix</h1>"));
    assert!(html.contains("<em>fast</em>"));
}

#[test]
fn test_source_command_loads_file_for_active_view() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("source.md");
    std::fs::write(&path, "# Imported one-pager").unwrap();

    let mut h = harness();
    h.app.execute(ReplCommand::View(DocumentKind::Briefing)).unwrap();
    assert_eq!(h.app.controller().mode(DocumentKind::Briefing), ViewMode::SourceInput);
    h.app.execute(ReplCommand::Source(path)).unwrap();
    assert_eq!(h.app.controller().mode(DocumentKind::Briefing), ViewMode::Chat);

    h.app.execute(ReplCommand::Send("Executives".to_string())).unwrap();
    h.app.wait_idle();
    assert_eq!(
        h.transport.calls()[0].1["originalOnePagerContent"],
        json!("# Imported one-pager")
    );
}

#[test]
fn test_source_on_one_pager_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("source.md");
    std::fs::write(&path, "text").unwrap();
    let mut h = harness();
    let err = h.app.execute(ReplCommand::Source(path)).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_quit_and_history() {
    let mut h = harness();
    h.app.controller_mut().activate(DocumentKind::OnePager);
    h.app.execute(ReplCommand::History).unwrap();
    assert!(h
        .sink
        .notices()
        .last()
        .unwrap()
        .starts_with("assistant: Type 'start'"));
    assert_eq!(h.app.execute(ReplCommand::Quit).unwrap(), Flow::Quit);
}

#[test]
fn test_script_mode_runs_lines_in_order() {
    let mut h = harness();
    h.transport.push_ok(200, r###"{"onePagerContent":"# Plan"}"###);
    h.transport.push_ok(200, r###"{"reportContent":"## Report"}"###);
    let input = Cursor::new("start\n/bogus\n/view report\nQ3 numbers\n/quit\nnever sent\n");

    let code = repl::run_script(&mut h.app, &NoopLog, input, DocumentKind::OnePager).unwrap();
    assert_eq!(code, 0);
    assert_eq!(h.transport.call_count(), 2);
    assert!(h
        .sink
        .notices()
        .iter()
        .any(|n| n.contains("Unknown command '/bogus'")));
    let report = h.app.controller().document(DocumentKind::Report).unwrap();
    assert_eq!(report.content, "## Report");
    assert_eq!(
        h.transport.calls()[1].1["onePagerSourceContent"],
        json!("# Plan")
    );
}

#[test]
fn test_storage_failure_degrades_to_memory() {
    let store = Arc::new(DegradingKeyValueStore::new(Arc::new(FailingStore), Arc::new(NoopLog)));
    let mut h = HarnessBuilder::new().store(store.clone()).build();
    h.transport.push_ok(200, r###"{"onePagerContent":"# In memory"}"###);

    h.app.send_once(DocumentKind::OnePager, "start").unwrap();
    assert!(store.is_degraded());
    let vc = h.app.controller();
    let id = vc.session_id(DocumentKind::OnePager).unwrap();
    assert_eq!(
        h.transport.calls()[0].1["documentId"],
        json!(id.to_string())
    );
    assert_eq!(
        vc.document(DocumentKind::OnePager).unwrap().content,
        "# In memory"
    );
}

#[test]
fn test_degraded_storage_keeps_persisted_one_pager_as_briefing_source() {
    let primary = Arc::new(BreakableStore::new());
    primary
        .set("onePagerActiveContent", "# Persisted plan")
        .unwrap();
    let store = Arc::new(DegradingKeyValueStore::new(primary.clone(), Arc::new(NoopLog)));
    let mut h = HarnessBuilder::new().store(store.clone()).build();
    primary.break_writes();

    h.app.controller_mut().activate(DocumentKind::Briefing);
    assert!(store.is_degraded());
    assert_eq!(
        h.app.controller().mode(DocumentKind::Briefing),
        ViewMode::Chat
    );
    assert_eq!(
        h.app
            .controller()
            .document(DocumentKind::OnePager)
            .unwrap()
            .content,
        "# Persisted plan"
    );

    let outcome = h.app.send_once(DocumentKind::Briefing, "Executives").unwrap();
    assert!(outcome.is_applied());
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(
        h.transport.calls()[0].1["originalOnePagerContent"],
        json!("# Persisted plan")
    );
}
