//! TUI Widget Tests
//!
//! Renders widgets and whole screens into a TestBackend
//!
//! Run: cargo test --test tui_widget_tests

use std::path::PathBuf;
use std::time::Instant;

use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use chatmap::config::Config;
use chatmap::core::{Direction, MessageNode, Minimap, NodeId, Role, Tooltip, TooltipAnchor};
use chatmap::transcript::{Transcript, TranscriptRecord};
use chatmap::tui::widgets::{MinimapView, TranscriptView};
use chatmap::tui::{render_app, Action, AppState, HoverTarget, Theme};
use tempfile::TempDir;

/// Helper to render a widget and capture buffer
fn render_widget<W>(widget: W, width: u16, height: u16) -> Vec<String>
where
    W: ratatui::widgets::Widget,
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|f| f.render_widget(widget, Rect::new(0, 0, width, height)))
        .unwrap();
    buffer_lines(terminal.backend().buffer(), width, height)
}

fn buffer_lines(buf: &ratatui::buffer::Buffer, width: u16, height: u16) -> Vec<String> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                .collect()
        })
        .collect()
}

fn record(role: &str, text: &str) -> TranscriptRecord {
    TranscriptRecord {
        key: None,
        role: Role::from_marker(role),
        author: role.to_string(),
        text: text.to_string(),
    }
}

fn write_chat(dir: &TempDir, name: &str, turns: usize) -> PathBuf {
    let path = dir.path().join(name);
    let mut content = String::new();
    for i in 0..turns {
        content.push_str(&format!("{{\"role\":\"user\",\"content\":\"question {i}\"}}\n"));
        content.push_str(&format!("{{\"role\":\"assistant\",\"content\":\"answer {i}\"}}\n"));
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn draw_app(state: &AppState, width: u16, height: u16) -> Vec<String> {
    let theme = Theme::default();
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| render_app(f, state, &theme)).unwrap();
    buffer_lines(terminal.backend().buffer(), width, height)
}

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.ui.smooth_scroll_ms = 0;
    config
}

// ============================================================================
// TRANSCRIPT VIEW
// ============================================================================

#[test]
fn test_transcript_view_renders_headers_and_text() {
    let mut transcript = Transcript::from_records(
        "chat",
        [record("user", "hello there"), record("assistant", "hi!")],
    );
    transcript.set_viewport(40, 40, 6);
    let theme = Theme::default();

    let lines = render_widget(TranscriptView::new(&transcript, &theme), 40, 6);
    assert!(lines[0].starts_with("▍user"));
    assert!(lines[1].starts_with("hello there"));
    assert!(lines[3].starts_with("▍assistant"));
    assert!(lines[4].starts_with("hi!"));
}

#[test]
fn test_transcript_view_marks_current_message() {
    let mut transcript = Transcript::from_records("chat", [record("user", "hello")]);
    transcript.set_viewport(40, 40, 3);
    let id = transcript.messages()[0].id;
    let theme = Theme::default();

    let lines = render_widget(
        TranscriptView::new(&transcript, &theme).current(Some(id)),
        40,
        3,
    );
    assert!(lines[0].contains("◀"));
}

#[test]
fn test_transcript_view_waiting_hint() {
    let transcript = Transcript::new("chat");
    let theme = Theme::default();
    let lines = render_widget(TranscriptView::new(&transcript, &theme), 40, 2);
    assert!(lines[0].contains("Waiting for transcript"));
}

// ============================================================================
// MINIMAP VIEW
// ============================================================================

fn minimap() -> Minimap {
    let mut minimap = Minimap::new(1.0);
    minimap.rebuild(&[
        MessageNode::user(1, "q"),
        MessageNode::other(2, "a"),
        MessageNode::user(3, "q2"),
    ]);
    minimap.set_viewport_height(10.0);
    minimap
}

#[test]
fn test_minimap_view_draws_controls_and_blocks() {
    let mut minimap = minimap();
    minimap.mark_current(Some(NodeId(3)));
    let theme = Theme::default();

    let lines = render_widget(MinimapView::new(&minimap, &theme), 12, 8);
    assert!(lines[0].starts_with('│'));
    assert!(lines[0].contains('▲'));
    assert!(lines[1].contains("█████████"));
    assert!(lines[2].contains("▒▒▒▒▒"));
    assert!(!lines[2].contains("▒▒▒▒▒▒"));
    assert!(lines[3].contains('▶'));
    assert!(lines[5].contains('▼'));
}

#[test]
fn test_minimap_view_shows_tooltip() {
    let minimap = minimap();
    let tooltip = Tooltip {
        anchor: TooltipAnchor::Control(Direction::Next),
        text: "how do I fix the login page".to_string(),
    };
    let theme = Theme::default();

    let lines = render_widget(
        MinimapView::new(&minimap, &theme)
            .tooltip(Some(&tooltip))
            .hovered(Some(HoverTarget::Nav(Direction::Next))),
        20,
        8,
    );
    assert!(lines[6].contains("how do I fix the"));
    assert!(lines[7].contains("login page"));
}

// ============================================================================
// WHOLE SCREEN
// ============================================================================

#[test]
fn test_app_screen_with_minimap() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.jsonl", 4);
    let state = AppState::new(vec![path], quiet_config(), (120, 30), Instant::now()).unwrap();

    let lines = draw_app(&state, 120, 30);
    assert!(lines[0].contains("▍user"));
    assert!(lines[0].contains('▲'));
    let status = &lines[29];
    assert!(status.contains("chat.jsonl"));
    assert!(status.contains("8 messages · 4 prompts · at 1/4"));
}

#[test]
fn test_app_screen_without_minimap_when_narrow() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.jsonl", 2);
    let state = AppState::new(vec![path], quiet_config(), (80, 20), Instant::now()).unwrap();

    let lines = draw_app(&state, 80, 20);
    assert!(lines.iter().all(|line| !line.contains('▲')));
    assert!(state.layout().minimap.is_none());
}

#[test]
fn test_hovering_next_control_shows_preview() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.jsonl", 3);
    let now = Instant::now();
    let mut state = AppState::new(vec![path], quiet_config(), (120, 30), now).unwrap();

    let down = state.layout().minimap.unwrap().down;
    state.apply(Action::PointerMoved { x: down.x + 2, y: down.y }, now);
    assert_eq!(
        state.controller().unwrap().tooltip().map(|t| t.text.as_str()),
        Some("question 1")
    );
    let tooltip_row = state.layout().minimap.unwrap().tooltip.y;
    let lines = draw_app(&state, 120, 30);
    assert!(lines[usize::from(tooltip_row)].contains("question 1"));

    state.apply(Action::PointerMoved { x: 0, y: 0 }, now);
    assert!(state.controller().unwrap().tooltip().is_none());
}

#[test]
fn test_clicking_a_block_moves_cursor() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.jsonl", 3);
    let now = Instant::now();
    let mut state = AppState::new(vec![path], quiet_config(), (120, 30), now).unwrap();

    let blocks = state.layout().minimap.unwrap().blocks;
    // fifth block: the third user message
    state.apply(Action::Click { x: blocks.x + 3, y: blocks.y + 4 }, now);
    state.tick(now);
    let controller = state.controller().unwrap();
    assert_eq!(controller.cursor().position(), Some(2));
    assert_eq!(
        controller.minimap().current().map(|block| block.id),
        controller.index().get(2).map(|entry| entry.id)
    );

    state.apply(Action::Navigate(Direction::Next), now);
    assert_eq!(state.controller().unwrap().cursor().position(), Some(0));
}

#[test]
fn test_quit_action_sets_flag() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.jsonl", 1);
    let now = Instant::now();
    let mut state = AppState::new(vec![path], quiet_config(), (120, 30), now).unwrap();
    assert!(!state.should_quit());
    state.apply(Action::Quit, now);
    assert!(state.should_quit());
}
