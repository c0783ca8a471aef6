//! Theme colors for the viewer

use ratatui::style::{Color, Modifier, Style};

use crate::core::Role;

/// Theme colors for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_main: Color,
    pub border: Color,
    pub border_focused: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// User messages and their minimap blocks
    pub user: Color,
    /// Every other role
    pub other: Color,
    /// The "current" marker
    pub current: Color,
    pub notice: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default)
    pub fn catppuccin_mocha() -> Self {
        Self {
            bg_main: Color::Rgb(30, 30, 46),
            border: Color::Rgb(69, 71, 90),
            border_focused: Color::Rgb(137, 180, 250),

            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            text_muted: Color::Rgb(108, 112, 134),

            user: Color::Rgb(137, 180, 250),
            other: Color::Rgb(166, 227, 161),
            current: Color::Rgb(249, 226, 175),
            notice: Color::Rgb(243, 139, 168),
        }
    }

    pub fn role_color(&self, role: Role) -> Color {
        match role {
            Role::User => self.user,
            Role::Other => self.other,
        }
    }

    /// Style of a message header line
    pub fn header_style(&self, role: Role, current: bool) -> Style {
        let color = if current {
            self.current
        } else {
            self.role_color(role)
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
