//! Transcript file tests
//!
//! Run: cargo test --test transcript_tests

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use chatmap::core::{
    ControllerEvent, Direction, HostDocument, Mutation, Role, SyncConfig, SyncController,
};
use chatmap::transcript::{Transcript, TranscriptWatcher};
use tempfile::TempDir;

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

fn watch(path: &Path) -> (Transcript, TranscriptWatcher) {
    let mut transcript = Transcript::new(path.display().to_string());
    transcript.set_viewport(120, 80, 20);
    (transcript, TranscriptWatcher::new(path, Duration::ZERO))
}

#[test]
fn test_missing_file_keeps_host_not_ready() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("later.jsonl");
    let (mut transcript, mut watcher) = watch(&path);

    assert!(watcher.read_new(&mut transcript).unwrap().is_empty());
    assert!(!transcript.is_ready());

    append(&path, "{\"role\":\"user\",\"content\":\"hello\"}\n");
    let mutations = watcher.read_new(&mut transcript).unwrap();
    assert_eq!(mutations, vec![Mutation::NodesAdded { messages: 1 }]);
    assert!(transcript.is_ready());
}

#[test]
fn test_reads_only_appended_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat.jsonl");
    append(
        &path,
        "{\"role\":\"user\",\"content\":\"one\"}\n{\"role\":\"assistant\",\"content\":\"two\"}\n",
    );
    let (mut transcript, mut watcher) = watch(&path);
    assert_eq!(watcher.read_new(&mut transcript).unwrap().len(), 2);
    assert!(watcher.read_new(&mut transcript).unwrap().is_empty());

    append(&path, "{\"role\":\"user\",\"content\":\"three\"}\n");
    assert_eq!(watcher.read_new(&mut transcript).unwrap().len(), 1);

    let texts: Vec<&str> = transcript.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(transcript.user_count(), 2);
}

#[test]
fn test_partial_line_waits_for_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stream.jsonl");
    append(&path, "{\"role\":\"user\",\"con");
    let (mut transcript, mut watcher) = watch(&path);

    assert!(watcher.read_new(&mut transcript).unwrap().is_empty());
    assert!(transcript.messages().is_empty());
    assert_eq!(watcher.skipped(), 0);

    append(&path, "tent\":\"finished\"}\n");
    assert_eq!(watcher.read_new(&mut transcript).unwrap().len(), 1);
    assert_eq!(transcript.messages()[0].text, "finished");
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.jsonl");
    append(
        &path,
        "{\"role\":\"user\",\"content\":\"ok\"}\nnot json\n{\"foo\":1}\n\n{\"role\":\"user\",\"content\":\"also ok\"}\n",
    );
    let (mut transcript, mut watcher) = watch(&path);

    assert_eq!(watcher.read_new(&mut transcript).unwrap().len(), 2);
    assert_eq!(watcher.skipped(), 2);
}

#[test]
fn test_truncation_reloads_from_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rewritten.jsonl");
    append(
        &path,
        "{\"role\":\"user\",\"content\":\"old one\"}\n{\"role\":\"user\",\"content\":\"old two\"}\n",
    );
    let (mut transcript, mut watcher) = watch(&path);
    watcher.read_new(&mut transcript).unwrap();

    std::fs::write(&path, "{\"role\":\"user\",\"content\":\"new\"}\n").unwrap();
    let mutations = watcher.read_new(&mut transcript).unwrap();
    assert_eq!(
        mutations,
        vec![
            Mutation::Reset { messages: 2 },
            Mutation::NodesAdded { messages: 1 },
        ]
    );
    assert_eq!(transcript.messages().len(), 1);
    assert_eq!(transcript.messages()[0].text, "new");
}

#[test]
fn test_truncation_to_empty_clears_minimap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cleared.jsonl");
    append(
        &path,
        "{\"role\":\"user\",\"content\":\"a\"}\n{\"role\":\"assistant\",\"content\":\"b\"}\n",
    );
    let (mut transcript, mut watcher) = watch(&path);
    watcher.read_new(&mut transcript).unwrap();

    let now = Instant::now();
    let config = SyncConfig {
        min_viewport_width: 100.0,
        ..SyncConfig::default()
    };
    let mut controller = SyncController::new(transcript, config);
    controller.start(now);
    assert_eq!(controller.minimap().len(), 2);

    std::fs::write(&path, "").unwrap();
    let mutations = watcher.read_new(controller.host_mut()).unwrap();
    assert_eq!(mutations, vec![Mutation::Reset { messages: 2 }]);
    controller.dispatch(ControllerEvent::Mutations(mutations), now);
    controller.tick(now + Duration::from_millis(100));

    assert!(controller.host().messages().is_empty());
    assert!(controller.index().is_empty());
    assert_eq!(controller.minimap().len(), 0);
    assert_eq!(controller.preview_adjacent(Direction::Next), None);
    assert!(!controller.nav_enabled());
}

#[test]
fn test_session_log_updates_replace_by_uuid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.jsonl");
    append(
        &path,
        concat!(
            r#"{"type":"summary","summary":"Fix login","leafUuid":"x"}"#,
            "\n",
            r#"{"type":"user","uuid":"u1","message":{"role":"user","content":"fix login"}}"#,
            "\n",
            r#"{"type":"assistant","uuid":"a1","message":{"role":"assistant","content":[{"type":"text","text":"Looking"}]}}"#,
            "\n",
        ),
    );
    let (mut transcript, mut watcher) = watch(&path);
    assert_eq!(watcher.read_new(&mut transcript).unwrap().len(), 2);
    let assistant = transcript.messages()[1].id;

    append(
        &path,
        concat!(
            r#"{"type":"assistant","uuid":"a1","message":{"role":"assistant","content":[{"type":"text","text":"Looking at auth.rs"}]}}"#,
            "\n",
        ),
    );
    assert_eq!(
        watcher.read_new(&mut transcript).unwrap(),
        vec![Mutation::TextChanged { id: assistant }]
    );
    assert_eq!(transcript.messages().len(), 2);
    assert_eq!(transcript.messages()[1].text, "Looking at auth.rs");
    assert_eq!(transcript.messages()[0].role, Role::User);
}

#[test]
fn test_live_transcript_feeds_controller() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("live.jsonl");
    append(
        &path,
        "{\"role\":\"user\",\"content\":\"first\"}\n{\"role\":\"assistant\",\"content\":\"reply\"}\n",
    );
    let (mut transcript, mut watcher) = watch(&path);
    watcher.read_new(&mut transcript).unwrap();

    let now = Instant::now();
    let config = SyncConfig {
        min_viewport_width: 100.0,
        ..SyncConfig::default()
    };
    let mut controller = SyncController::new(transcript, config);
    controller.set_minimap_viewport(10.0);
    controller.start(now);
    assert_eq!(controller.index().len(), 1);

    append(&path, "{\"role\":\"user\",\"content\":\"second\"}\n");
    let mutations = watcher.read_new(controller.host_mut()).unwrap();
    controller.dispatch(ControllerEvent::Mutations(mutations), now);
    assert_eq!(controller.index().len(), 1);

    controller.tick(now + Duration::from_millis(100));
    assert_eq!(controller.index().len(), 2);
    assert_eq!(controller.minimap().len(), 3);

    controller.dispatch(
        ControllerEvent::NavPressed(Direction::Next),
        now + Duration::from_millis(100),
    );
    assert_eq!(controller.cursor().position(), Some(1));
    assert!(controller.host().is_animating());
}
