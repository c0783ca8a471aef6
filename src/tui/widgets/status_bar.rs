//! Status bar widget
//!
//! Shows the open file, message counts and the navigation cursor in a
//! single line, with key hints or the latest notice on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::theme::Theme;

const KEY_HINTS: &str = "n/p jump · J/K minimap · Tab file · q quit ";

/// Status bar state
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    /// Name of the open file
    pub file: String,
    /// (active, total) when several files are open
    pub file_position: Option<(usize, usize)>,
    pub messages: usize,
    pub user_messages: usize,
    /// Zero-based navigation cursor
    pub cursor: Option<usize>,
    /// Whether the controller is attached yet
    pub live: bool,
    pub notice: Option<String>,
}

impl StatusBar {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn with_file_position(mut self, active: usize, total: usize) -> Self {
        self.file_position = (total > 1).then_some((active, total));
        self
    }

    pub fn with_counts(mut self, messages: usize, user_messages: usize) -> Self {
        self.messages = messages;
        self.user_messages = user_messages;
        self
    }

    pub fn with_cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

/// Renderable status bar widget
pub struct StatusBarWidget<'a> {
    status: &'a StatusBar,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(status: &'a StatusBar, theme: &'a Theme) -> Self {
        Self { status, theme }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.bg_main));

        let mut spans = vec![Span::styled(
            format!(" {} ", self.status.file),
            Style::default()
                .fg(self.theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some((active, total)) = self.status.file_position {
            spans.push(Span::styled(
                format!("[{}/{}] ", active + 1, total),
                Style::default().fg(self.theme.text_muted),
            ));
        }
        spans.push(Span::styled("│", Style::default().fg(self.theme.border)));

        if self.status.live {
            let cursor = match self.status.cursor {
                Some(position) => format!("{}/{}", position + 1, self.status.user_messages),
                None => "-".to_string(),
            };
            spans.push(Span::styled(
                format!(
                    " {} messages · {} prompts · at {} ",
                    self.status.messages, self.status.user_messages, cursor
                ),
                Style::default().fg(self.theme.text_secondary),
            ));
        } else {
            spans.push(Span::styled(
                " loading… ",
                Style::default().fg(self.theme.text_muted),
            ));
        }

        let left = Line::from(spans);
        let left_width = left.width() as u16;
        buf.set_line(area.x, area.y, &left, area.width);

        let right = match &self.status.notice {
            Some(notice) => Span::styled(
                format!("{} ", notice),
                Style::default().fg(self.theme.notice),
            ),
            None => Span::styled(KEY_HINTS, Style::default().fg(self.theme.text_muted)),
        };
        let right_width = right.width() as u16;
        if left_width + right_width < area.width {
            let x = area.x + area.width - right_width;
            buf.set_span(x, area.y, &right, right_width);
        }
    }
}
