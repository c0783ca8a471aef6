//! Transcript pane

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::NodeId;
use crate::transcript::{LineKind, Transcript};
use crate::tui::theme::Theme;

/// Renders the visible part of a transcript
pub struct TranscriptView<'a> {
    transcript: &'a Transcript,
    /// Message bearing the "current" marker
    current: Option<NodeId>,
    theme: &'a Theme,
}

impl<'a> TranscriptView<'a> {
    pub fn new(transcript: &'a Transcript, theme: &'a Theme) -> Self {
        Self {
            transcript,
            current: None,
            theme,
        }
    }

    pub fn current(mut self, current: Option<NodeId>) -> Self {
        self.current = current;
        self
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.transcript.messages().is_empty() {
            let hint = if self.transcript.is_loaded() {
                "No messages yet"
            } else {
                "Waiting for transcript…"
            };
            buf.set_string(
                area.x,
                area.y,
                hint,
                Style::default().fg(self.theme.text_muted),
            );
            return;
        }

        for (row, line) in self.transcript.visible_lines().into_iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            if row >= area.height {
                break;
            }
            let rendered = match line.kind {
                LineKind::Header => {
                    let current = self.current == Some(line.id);
                    let style = self.theme.header_style(line.role, current);
                    let mut spans = vec![Span::styled(format!("▍{}", line.text), style)];
                    if current {
                        spans.push(Span::styled(" ◀", style));
                    }
                    Line::from(spans)
                }
                LineKind::Body => Line::styled(line.text, Style::default().fg(self.theme.text_primary)),
                LineKind::Separator => Line::default(),
            };
            buf.set_line(area.x, area.y + row, &rendered, area.width);
        }
    }
}
