//! Core traits for the domain layer
//!
//! The controller never touches a concrete document. Hosts (the transcript
//! viewer, test fakes) implement [`HostDocument`] and are injected.

use super::types::{MessageNode, NodeId, ScrollBehavior, ScrollMetrics};

/// The live document whose messages are mapped and navigated
///
/// Implementations report geometry in their own units (lines, pixels); the
/// controller only ever compares ratios.
pub trait HostDocument {
    /// Whether the conversation container exists yet
    fn is_ready(&self) -> bool;

    /// All message nodes currently in the document, in document order
    fn message_nodes(&self) -> Vec<MessageNode>;

    /// Scroll geometry of the primary surface
    fn primary_metrics(&self) -> ScrollMetrics;

    /// Jump the primary surface to `offset` without animation
    fn scroll_primary_to(&mut self, offset: f64);

    /// Bring a message to the vertical center of the viewport
    ///
    /// Unknown or stale ids are ignored.
    fn scroll_into_view(&mut self, id: NodeId, behavior: ScrollBehavior);

    /// Width of the host viewport, compared against the minimap threshold
    fn viewport_width(&self) -> f64;
}
