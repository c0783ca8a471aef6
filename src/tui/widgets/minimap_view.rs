//! Minimap column
//!
//! A "previous" control, one row per message (user messages as full-width
//! bars, the rest as shaded half bars), a "next" control and the tooltip.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::{Block, Direction, Minimap, Role, Tooltip};
use crate::transcript::layout::wrap_text;
use crate::tui::app::HoverTarget;
use crate::tui::layout::{MinimapLayout, TOOLTIP_ROWS};
use crate::tui::theme::Theme;

pub struct MinimapView<'a> {
    minimap: &'a Minimap,
    tooltip: Option<&'a Tooltip>,
    nav_enabled: bool,
    hovered: Option<HoverTarget>,
    theme: &'a Theme,
}

impl<'a> MinimapView<'a> {
    pub fn new(minimap: &'a Minimap, theme: &'a Theme) -> Self {
        Self {
            minimap,
            tooltip: None,
            nav_enabled: true,
            hovered: None,
            theme,
        }
    }

    pub fn tooltip(mut self, tooltip: Option<&'a Tooltip>) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn nav_enabled(mut self, enabled: bool) -> Self {
        self.nav_enabled = enabled;
        self
    }

    pub fn hovered(mut self, hovered: Option<HoverTarget>) -> Self {
        self.hovered = hovered;
        self
    }

    fn control(&self, direction: Direction, area: Rect, buf: &mut Buffer) {
        let symbol = match direction {
            Direction::Previous => "▲",
            Direction::Next => "▼",
        };
        let style = if !self.nav_enabled {
            Style::default().fg(self.theme.text_muted)
        } else if self.hovered == Some(HoverTarget::Nav(direction)) {
            Style::default()
                .fg(self.theme.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text_primary)
        };
        let x = area.x + area.width.saturating_sub(1) / 2;
        buf.set_string(x, area.y, symbol, style);
    }

    fn block_line(&self, position: usize, block: &Block, width: u16) -> Line<'static> {
        let bar_width = usize::from(width.saturating_sub(2));
        let (bar, color) = match block.role {
            Role::User => ("█".repeat(bar_width), self.theme.user),
            Role::Other => ("▒".repeat(bar_width.div_ceil(2)), self.theme.other),
        };
        let mut style = Style::default().fg(if block.current {
            self.theme.current
        } else {
            color
        });
        if self.hovered == Some(HoverTarget::Block(position)) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let marker = if block.current { "▶" } else { " " };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(self.theme.current)),
            Span::styled(bar, style),
        ])
    }
}

impl Widget for MinimapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 2 {
            return;
        }
        let layout = MinimapLayout::new(area);

        for y in area.y..area.y + area.height {
            buf.set_string(area.x, y, "│", Style::default().fg(self.theme.border));
        }

        self.control(Direction::Previous, layout.up, buf);
        self.control(Direction::Next, layout.down, buf);

        let first = self.minimap.offset().round() as usize;
        for row in 0..layout.blocks.height {
            let position = first + usize::from(row);
            let Some(block) = self.minimap.block(position) else {
                break;
            };
            let line = self.block_line(position, block, layout.blocks.width);
            buf.set_line(
                layout.blocks.x,
                layout.blocks.y + row,
                &line,
                layout.blocks.width,
            );
        }

        if let Some(tooltip) = self.tooltip {
            let style = Style::default()
                .fg(self.theme.text_secondary)
                .add_modifier(Modifier::ITALIC);
            let lines = wrap_text(&tooltip.text, usize::from(layout.tooltip.width));
            for (row, text) in (0..TOOLTIP_ROWS.min(layout.tooltip.height)).zip(lines) {
                buf.set_stringn(
                    layout.tooltip.x,
                    layout.tooltip.y + row,
                    text,
                    usize::from(layout.tooltip.width),
                    style,
                );
            }
        }
    }
}
