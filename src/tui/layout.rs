//! Screen layout and hit testing

use ratatui::layout::{Constraint, Direction as Axis, Layout, Rect};

use crate::core::Direction;

/// Rows under the blocks reserved for the tooltip
pub const TOOLTIP_ROWS: u16 = 2;

/// Areas of the minimap column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapLayout {
    /// Whole column, including its left border
    pub column: Rect,
    /// "Previous" control
    pub up: Rect,
    /// One row per block
    pub blocks: Rect,
    /// "Next" control
    pub down: Rect,
    pub tooltip: Rect,
}

impl MinimapLayout {
    pub fn new(column: Rect) -> Self {
        let inner = Rect {
            x: column.x.saturating_add(1),
            width: column.width.saturating_sub(1),
            ..column
        };
        let rows = Layout::default()
            .direction(Axis::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(TOOLTIP_ROWS),
            ])
            .split(inner);
        Self {
            column,
            up: rows[0],
            blocks: rows[1],
            down: rows[2],
            tooltip: rows[3],
        }
    }
}

/// Where the screen is divided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    pub transcript: Rect,
    pub minimap: Option<MinimapLayout>,
    pub status: Rect,
}

/// What lies under a screen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Transcript,
    Nav(Direction),
    /// Row inside the block area, relative to its top
    BlockRow(u16),
    /// Minimap chrome (border, tooltip)
    Minimap,
    Status,
    Outside,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self::compute(Rect::default(), false, 0)
    }
}

impl ViewLayout {
    pub fn compute(area: Rect, minimap_visible: bool, column_width: u16) -> Self {
        let rows = Layout::default()
            .direction(Axis::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let (body, status) = (rows[0], rows[1]);

        if !minimap_visible || column_width == 0 || body.width <= column_width {
            return Self {
                transcript: body,
                minimap: None,
                status,
            };
        }

        let columns = Layout::default()
            .direction(Axis::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(column_width)])
            .split(body);
        Self {
            transcript: columns[0],
            minimap: Some(MinimapLayout::new(columns[1])),
            status,
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> HitTarget {
        let inside = |rect: Rect| {
            x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
        };

        if inside(self.transcript) {
            return HitTarget::Transcript;
        }
        if inside(self.status) {
            return HitTarget::Status;
        }
        match self.minimap {
            Some(minimap) if inside(minimap.up) => HitTarget::Nav(Direction::Previous),
            Some(minimap) if inside(minimap.down) => HitTarget::Nav(Direction::Next),
            Some(minimap) if inside(minimap.blocks) => HitTarget::BlockRow(y - minimap.blocks.y),
            Some(minimap) if inside(minimap.column) => HitTarget::Minimap,
            _ => HitTarget::Outside,
        }
    }
}
