//! TUI Renderer
//!
//! Draws [`AppState`] and turns terminal input into [`Action`]s. Business
//! logic stays in the state; this module only knows about cells and keys.

use std::path::Path;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};

use crate::core::Direction;

use super::app::{Action, AppState};
use super::events::Event;
use super::layout::HitTarget;
use super::theme::Theme;
use super::widgets::{MinimapView, StatusBar, StatusBarWidget, TranscriptView};

/// Lines or rows moved by one wheel notch
const WHEEL_STEP: f64 = 3.0;

/// TUI Renderer implementation
pub struct TuiRenderer<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
}

impl<B: Backend> TuiRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            theme: Theme::default(),
        }
    }

    /// Get reference to terminal (for testing)
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    pub fn draw(&mut self, state: &AppState) -> Result<()> {
        let theme = &self.theme;
        self.terminal.draw(|frame| render_app(frame, state, theme))?;
        Ok(())
    }
}

/// Draw the whole screen
pub fn render_app(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let layout = *state.layout();
    let Some(controller) = state.controller() else {
        return;
    };
    let transcript = controller.host();
    let current = controller.minimap().current().map(|block| block.id);

    frame.render_widget(
        TranscriptView::new(transcript, theme).current(current),
        layout.transcript,
    );

    if let Some(minimap) = layout.minimap {
        frame.render_widget(
            MinimapView::new(controller.minimap(), theme)
                .tooltip(controller.tooltip())
                .nav_enabled(controller.nav_enabled())
                .hovered(state.hovered()),
            minimap.column,
        );
    }

    let file = Path::new(transcript.location())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| transcript.location().to_string());
    let status = StatusBar::new(file)
        .with_file_position(state.active_file(), state.files().len())
        .with_counts(transcript.messages().len(), controller.index().len())
        .with_cursor(controller.cursor().position())
        .with_live(controller.is_live())
        .with_notice(state.notice().map(str::to_string));
    frame.render_widget(StatusBarWidget::new(&status, theme), layout.status);
}

/// Translate a terminal event
pub fn event_to_action(event: &Event, state: &AppState) -> Option<Action> {
    match event {
        Event::Key(key) => key_to_action(*key),
        Event::Mouse(mouse) => mouse_to_action(*mouse, state),
        Event::Resize { width, height } => Some(Action::Resize {
            width: *width,
            height: *height,
        }),
    }
}

/// Convert keyboard event to action
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), _) => Action::Quit,

        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::Navigate(Direction::Next),
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::Char('N'), _) => {
            Action::Navigate(Direction::Previous)
        }

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            Action::ScrollTranscript(1.0)
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            Action::ScrollTranscript(-1.0)
        }
        (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => Action::PageTranscript(1.0),
        (KeyCode::PageUp, _) => Action::PageTranscript(-1.0),
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::TranscriptTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::TranscriptBottom,

        (KeyCode::Char('J'), _) => Action::ScrollMinimap(1.0),
        (KeyCode::Char('K'), _) => Action::ScrollMinimap(-1.0),

        // BackTab arrives with or without SHIFT depending on the terminal
        (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
            Action::SwitchFile(Direction::Previous)
        }
        (KeyCode::Tab, _) => Action::SwitchFile(Direction::Next),

        _ => return None,
    };
    Some(action)
}

/// Convert mouse event to action
pub fn mouse_to_action(mouse: MouseEvent, state: &AppState) -> Option<Action> {
    let (x, y) = (mouse.column, mouse.row);
    let over_minimap = matches!(
        state.layout().hit_test(x, y),
        HitTarget::Nav(_) | HitTarget::BlockRow(_) | HitTarget::Minimap
    );
    let wheel = |delta: f64| {
        if over_minimap {
            Action::ScrollMinimap(delta)
        } else {
            Action::ScrollTranscript(delta)
        }
    };

    match mouse.kind {
        MouseEventKind::ScrollDown => Some(wheel(WHEEL_STEP)),
        MouseEventKind::ScrollUp => Some(wheel(-WHEEL_STEP)),
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Click { x, y }),
        MouseEventKind::Moved => Some(Action::PointerMoved { x, y }),
        _ => None,
    }
}
