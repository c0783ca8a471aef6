//! Canonical type definitions for the core domain
//!
//! This module contains the single source of truth for the types shared by the
//! controller, the host documents, and the terminal shell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a message node inside a host document
///
/// Identity survives rebuilds; positions do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Author role of a message, as far as the minimap cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Written by the person reading the conversation
    User,
    /// Anything else (assistant, system, tool output)
    #[default]
    Other,
}

impl Role {
    /// Map a host role marker to a role
    ///
    /// Only the exact marker `user` (case-insensitive) counts as a user message.
    pub fn from_marker(marker: &str) -> Self {
        if marker.trim().eq_ignore_ascii_case("user") {
            Self::User
        } else {
            Self::Other
        }
    }

    pub fn is_user(self) -> bool {
        matches!(self, Self::User)
    }

    /// Short label used in listings
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Other => "other",
        }
    }
}

/// Snapshot of one message node, as returned by the host's message query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub id: NodeId,
    pub role: Role,
    /// Plain-text content (used for previews)
    pub text: String,
}

impl MessageNode {
    pub fn new(id: NodeId, role: Role, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
        }
    }

    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self::new(NodeId(id), Role::User, text)
    }

    pub fn other(id: u64, text: impl Into<String>) -> Self {
        Self::new(NodeId(id), Role::Other, text)
    }
}

/// Navigation direction for the previous/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Next => "Next user message",
            Self::Previous => "Previous user message",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Next => Self::Previous,
            Self::Previous => Self::Next,
        }
    }
}

/// How a host should move its viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Animated scroll
    Smooth,
    /// Jump immediately
    Instant,
}

/// One of the two scrollable surfaces kept in sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The host document being navigated
    Primary,
    /// The minimap
    Secondary,
}

impl Surface {
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Scroll geometry of a surface, in the surface's own units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top
    pub offset: f64,
    /// Total scrollable content height
    pub scroll_height: f64,
    /// Height of the visible viewport
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(offset: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            offset,
            scroll_height,
            client_height,
        }
    }

    /// Distance the surface can scroll (may be zero or negative)
    pub fn extent(&self) -> f64 {
        self.scroll_height - self.client_height
    }

    /// Whether the content overflows the viewport
    pub fn overflows(&self) -> bool {
        self.extent() > 0.0
    }

    /// Scroll position as a fraction of the extent
    ///
    /// `None` when the surface does not overflow.
    pub fn ratio(&self) -> Option<f64> {
        let extent = self.extent();
        if extent > 0.0 && extent.is_finite() {
            Some(self.offset / extent)
        } else {
            None
        }
    }
}

/// A change notification from the host document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Nodes were inserted; `messages` counts message nodes among or inside them
    NodesAdded { messages: usize },
    /// Nodes were removed
    NodesRemoved { messages: usize },
    /// The role marker of a message changed
    RoleChanged { id: NodeId },
    /// Text of a message changed
    TextChanged { id: NodeId },
    /// The whole document was replaced; `messages` counts what was dropped
    Reset { messages: usize },
}

impl Mutation {
    /// Whether this mutation warrants rebuilding the index
    ///
    /// Insertions carrying messages, role changes and resets do; edits and
    /// removals alone are picked up by the next rebuild.
    pub fn affects_index(&self) -> bool {
        match self {
            Self::NodesAdded { messages } => *messages > 0,
            Self::RoleChanged { .. } | Self::Reset { .. } => true,
            Self::NodesRemoved { .. } | Self::TextChanged { .. } => false,
        }
    }
}
