//! UI Widgets for the viewer

mod minimap_view;
mod status_bar;
mod transcript_view;

pub use minimap_view::MinimapView;
pub use status_bar::{StatusBar, StatusBarWidget};
pub use transcript_view::TranscriptView;
