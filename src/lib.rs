//! chatmap: navigable minimap for chat transcripts
//!
//! This library provides:
//! - A host-agnostic controller keeping a minimap of a conversation in sync
//!   with the conversation view (index of user messages, previous/next
//!   navigation, two-way proportional scroll sync with a loop guard)
//! - A transcript host reading JSON Lines chat logs as they are written
//! - A terminal viewer built on ratatui

pub mod cli;
pub mod config;
pub mod core;
pub mod transcript;
pub mod tui;

pub use config::Config;
pub use crate::core::{HostDocument, OverlaySlot, SyncConfig, SyncController};
pub use transcript::Transcript;
