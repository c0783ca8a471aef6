//! Core domain modules
//!
//! Host-agnostic minimap logic: the message index, navigation cursor, scroll
//! synchronization and the controller tying them together. Nothing in here
//! knows about terminals or files.

pub mod controller;
pub mod cursor;
pub mod errors;
pub mod message_index;
pub mod minimap;
pub mod overlay;
pub mod scroll_sync;
pub mod timers;
pub mod traits;
pub mod types;

// Re-export main types for convenience
pub use controller::{
    ControllerEvent, Phase, SyncConfig, SyncController, Tooltip, TooltipAnchor,
};
pub use cursor::NavigationCursor;
pub use errors::TranscriptError;
pub use message_index::{excerpt, IndexedMessage, MessageIndex};
pub use minimap::{Block, Minimap};
pub use overlay::OverlaySlot;
pub use scroll_sync::{proportional_target, SyncGuard, SyncState};
pub use timers::Debounce;
pub use traits::HostDocument;
pub use types::{
    Direction, MessageNode, Mutation, NodeId, Role, ScrollBehavior, ScrollMetrics, Surface,
};
