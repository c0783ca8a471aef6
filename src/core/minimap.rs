//! Secondary surface: one block per message, scrolled in sync with the host

use super::types::{MessageNode, NodeId, Role, ScrollMetrics};

/// Visual stand-in for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NodeId,
    pub role: Role,
    /// Position among all messages
    pub order: usize,
    /// Carries the "current" marker
    pub current: bool,
}

/// Scrollable column of blocks mirroring the document's message order
#[derive(Debug, Clone)]
pub struct Minimap {
    blocks: Vec<Block>,
    offset: f64,
    block_height: f64,
    viewport_height: f64,
    visible: bool,
}

impl Default for Minimap {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Minimap {
    pub fn new(block_height: f64) -> Self {
        Self {
            blocks: Vec::new(),
            offset: 0.0,
            block_height: block_height.max(f64::MIN_POSITIVE),
            viewport_height: 0.0,
            visible: true,
        }
    }

    /// Replace every block with one per node, in order
    ///
    /// Drops the current marker; the caller re-applies it.
    pub fn rebuild(&mut self, nodes: &[MessageNode]) {
        self.blocks = nodes
            .iter()
            .enumerate()
            .map(|(order, node)| Block {
                id: node.id,
                role: node.role,
                order,
                current: false,
            })
            .collect();
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Move the "current" marker to `id`, clearing any previous one
    pub fn mark_current(&mut self, id: Option<NodeId>) {
        for block in &mut self.blocks {
            block.current = Some(block.id) == id;
        }
    }

    pub fn current(&self) -> Option<&Block> {
        self.blocks.iter().find(|block| block.current)
    }

    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.offset,
            self.blocks.len() as f64 * self.block_height,
            self.viewport_height,
        )
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn max_offset(&self) -> f64 {
        self.metrics().extent().max(0.0)
    }

    /// Set the scroll offset, clamped to the scrollable range
    ///
    /// Returns whether the offset moved; a move raises a scroll event.
    pub fn set_offset(&mut self, offset: f64) -> bool {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.max_offset())
        } else {
            0.0
        };
        let moved = (clamped - self.offset).abs() > f64::EPSILON;
        self.offset = clamped;
        moved
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn block_height(&self) -> f64 {
        self.block_height
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Block under a viewport-relative y coordinate
    pub fn block_at(&self, y: f64) -> Option<usize> {
        if y < 0.0 || y >= self.viewport_height {
            return None;
        }
        let position = ((self.offset + y) / self.block_height).floor() as usize;
        (position < self.blocks.len()).then_some(position)
    }

    /// Range of block positions intersecting the viewport
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let first = (self.offset / self.block_height).floor() as usize;
        let last = ((self.offset + self.viewport_height) / self.block_height).ceil() as usize;
        first.min(self.blocks.len())..last.min(self.blocks.len())
    }

    /// Remove every block and hide the surface
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.offset = 0.0;
        self.visible = false;
    }
}
