//! Terminal viewer for chat transcripts
//!
//! A transcript pane with the minimap column on its right, built on
//! ratatui/crossterm. The state ([`AppState`]) is terminal-free so it can be
//! driven from tests; the renderer and controller own the terminal.

pub mod app;
pub mod controller;
pub mod events;
pub mod layout;
pub mod renderer;
pub mod theme;
pub mod widgets;

pub use app::{Action, AppState, HoverTarget};
pub use controller::{run_viewer, TuiController};
pub use events::{coalesce, translate, Event, EventHandler};
pub use layout::{HitTarget, MinimapLayout, ViewLayout};
pub use renderer::{render_app, TuiRenderer};
pub use theme::Theme;
