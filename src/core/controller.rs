//! Sync controller
//!
//! Owns the message index, the navigation cursor, the minimap and the loop
//! guard, and reacts to events coming from the host document and from the
//! user. Every handler runs to completion; deferred work goes through
//! deadline timers fired by [`SyncController::tick`].
//!
//! Event flow:
//!
//! ```text
//! mutations ──► rebuild debounce ──► rebuild index + blocks ──► resync minimap
//! user scroll (primary)   ──► claim guard ──► write minimap offset ──► echo ignored
//! user scroll (secondary) ──► claim guard ──► write host offset    ──► echo ignored
//! nav press / block click ──► cursor ──► host.scroll_into_view + current marker
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::cursor::NavigationCursor;
use super::message_index::{excerpt, MessageIndex};
use super::minimap::Minimap;
use super::scroll_sync::{proportional_target, SyncGuard};
use super::timers::{earliest, Debounce};
use super::traits::HostDocument;
use super::types::{Direction, Mutation, NodeId, ScrollBehavior, Surface};

/// Viewport width under which the minimap is hidden
pub const DEFAULT_MIN_VIEWPORT_WIDTH: f64 = 768.0;

/// Characters shown when previewing the adjacent user message
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// Characters shown when hovering a user block
pub const DEFAULT_BLOCK_PREVIEW_CHARS: usize = 20;

/// Tunables for the controller
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long an echo from the other surface is ignored after a sync
    pub guard_window: Duration,
    /// Quiet period before a burst of mutations triggers a rebuild
    pub rebuild_debounce: Duration,
    /// Interval between readiness checks while the host is loading
    pub ready_poll: Duration,
    /// Delay before re-initializing after the host location changes
    pub reinit_delay: Duration,
    /// Host viewport width under which the minimap is hidden
    pub min_viewport_width: f64,
    pub preview_chars: usize,
    pub block_preview_chars: usize,
    /// Height of one minimap block, in minimap units
    pub block_height: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            guard_window: Duration::from_millis(100),
            rebuild_debounce: Duration::from_millis(100),
            ready_poll: Duration::from_millis(500),
            reinit_delay: Duration::from_millis(1000),
            min_viewport_width: DEFAULT_MIN_VIEWPORT_WIDTH,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            block_preview_chars: DEFAULT_BLOCK_PREVIEW_CHARS,
            block_height: 1.0,
        }
    }
}

/// Lifecycle of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Polling until the host document is ready; listeners not attached
    WaitingForHost,
    /// Attached and reacting to events
    Live,
    /// Detached; every event is ignored
    Destroyed,
}

/// Inputs the controller reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Batch of host document changes
    Mutations(Vec<Mutation>),
    /// The host document scrolled
    PrimaryScrolled,
    /// The minimap scrolled
    SecondaryScrolled,
    /// The host viewport changed width
    Resized { width: f64 },
    /// A previous/next control was activated
    NavPressed(Direction),
    /// The pointer entered a previous/next control
    NavHovered(Direction),
    /// A minimap block (by position) was clicked
    BlockClicked(usize),
    /// The pointer entered a minimap block
    BlockHovered(usize),
    /// The pointer left a control or block
    PointerLeft,
}

/// What a tooltip is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAnchor {
    Control(Direction),
    Block(usize),
}

/// Preview text shown next to a control or block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub anchor: TooltipAnchor,
    pub text: String,
}

/// Keeps a minimap in sync with a host document
pub struct SyncController<H: HostDocument> {
    host: H,
    config: SyncConfig,
    phase: Phase,
    index: MessageIndex,
    cursor: NavigationCursor,
    minimap: Minimap,
    /// Message bearing the "current" marker
    highlighted: Option<NodeId>,
    guard: SyncGuard,
    rebuild_timer: Debounce,
    ready_timer: Debounce,
    tooltip: Option<Tooltip>,
    /// Scroll events raised by our own programmatic writes
    echoes: VecDeque<ControllerEvent>,
}

impl<H: HostDocument> SyncController<H> {
    /// Create a controller; nothing is attached until [`start`](Self::start)
    pub fn new(host: H, config: SyncConfig) -> Self {
        Self {
            host,
            minimap: Minimap::new(config.block_height),
            guard: SyncGuard::new(config.guard_window),
            rebuild_timer: Debounce::new(config.rebuild_debounce),
            ready_timer: Debounce::new(config.ready_poll),
            config,
            phase: Phase::WaitingForHost,
            index: MessageIndex::default(),
            cursor: NavigationCursor::none(),
            highlighted: None,
            tooltip: None,
            echoes: VecDeque::new(),
        }
    }

    /// Attach to the host, or start polling until it is ready
    pub fn start(&mut self, now: Instant) {
        if self.phase == Phase::WaitingForHost {
            self.poll_ready(now);
        }
    }

    fn poll_ready(&mut self, now: Instant) {
        if self.host.is_ready() {
            self.attach();
        } else {
            tracing::debug!(
                "Host document not ready, retrying in {:?}",
                self.ready_timer.delay()
            );
            self.ready_timer.schedule(now);
        }
    }

    fn attach(&mut self) {
        self.phase = Phase::Live;
        self.ready_timer.cancel();
        let width = self.host.viewport_width();
        self.apply_viewport_width(width);
        self.rebuild();
        tracing::info!("Minimap attached ({} messages)", self.minimap.len());
    }

    /// Handle one event, then any echo events it caused
    pub fn dispatch(&mut self, event: ControllerEvent, now: Instant) {
        if self.phase != Phase::Live {
            tracing::trace!("Ignoring {:?} while {:?}", event, self.phase);
            return;
        }
        self.handle(event, now);
        self.drain_echoes(now);
    }

    fn drain_echoes(&mut self, now: Instant) {
        while let Some(echo) = self.echoes.pop_front() {
            self.handle(echo, now);
        }
    }

    fn handle(&mut self, event: ControllerEvent, now: Instant) {
        match event {
            ControllerEvent::Mutations(mutations) => {
                if mutations.iter().any(Mutation::affects_index) {
                    self.rebuild_timer.schedule(now);
                }
            }
            ControllerEvent::PrimaryScrolled => self.on_scroll(Surface::Primary, now),
            ControllerEvent::SecondaryScrolled => self.on_scroll(Surface::Secondary, now),
            ControllerEvent::Resized { width } => self.apply_viewport_width(width),
            ControllerEvent::NavPressed(direction) => {
                self.navigate(direction);
            }
            ControllerEvent::NavHovered(direction) => {
                self.tooltip = self.preview_adjacent(direction).map(|text| Tooltip {
                    anchor: TooltipAnchor::Control(direction),
                    text,
                });
            }
            ControllerEvent::BlockClicked(position) => self.select_block(position),
            ControllerEvent::BlockHovered(position) => {
                self.tooltip = self.block_preview(position).map(|text| Tooltip {
                    anchor: TooltipAnchor::Block(position),
                    text,
                });
            }
            ControllerEvent::PointerLeft => self.tooltip = None,
        }
    }

    /// Fire due timers
    pub fn tick(&mut self, now: Instant) {
        match self.phase {
            Phase::WaitingForHost => {
                if self.ready_timer.fire_if_due(now) {
                    self.poll_ready(now);
                }
            }
            Phase::Live => {
                if self.rebuild_timer.fire_if_due(now) {
                    self.rebuild();
                }
                self.guard.expire(now);
            }
            Phase::Destroyed => {}
        }
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.ready_timer.deadline(),
            self.rebuild_timer.deadline(),
            self.guard.deadline(),
        ])
    }

    /// Rebuild the index and blocks from the current document
    pub fn rebuild(&mut self) {
        let selected = self
            .cursor
            .position()
            .and_then(|position| self.index.get(position))
            .map(|entry| entry.id);

        let nodes = self.host.message_nodes();
        self.index = MessageIndex::build(&nodes);
        self.minimap.rebuild(&nodes);

        match selected.and_then(|id| self.index.position_of(id)) {
            Some(position) => self.cursor.select(position),
            None => self.cursor.clear(),
        }
        if self.cursor.is_none() && !self.index.is_empty() {
            self.cursor.select(0);
        }

        let highlighted = self
            .highlighted
            .filter(|id| self.index.position_of(*id).is_some());
        self.highlight(highlighted);
        self.tooltip = None;

        tracing::debug!(
            "Rebuilt index: {} messages, {} from user, cursor {:?}",
            nodes.len(),
            self.index.len(),
            self.cursor.position()
        );

        self.realign();
    }

    /// Re-mirror the host position onto the minimap
    ///
    /// Used after the shell changes either surface's geometry.
    pub fn resync(&mut self) {
        if self.phase != Phase::Live {
            return;
        }
        self.realign();
    }

    /// Programmatic alignment: leaves the guard alone and raises no echo,
    /// so a user scroll right after it still propagates.
    fn realign(&mut self) {
        if !self.minimap.is_visible() {
            return;
        }
        if let Some(target) = proportional_target(self.host.primary_metrics(), self.minimap.metrics())
        {
            tracing::trace!("Realigned minimap offset -> {:.2}", target);
            self.minimap.set_offset(target);
        }
    }

    fn on_scroll(&mut self, surface: Surface, now: Instant) {
        if !self.guard.claim(surface, now) {
            tracing::trace!("Suppressed {:?} scroll echo", surface);
            return;
        }
        match surface {
            Surface::Primary => self.sync_secondary_from_primary(now),
            Surface::Secondary => self.sync_primary_from_secondary(now),
        }
    }

    /// Mirror the host's scroll ratio onto the minimap
    pub fn sync_secondary_from_primary(&mut self, now: Instant) {
        if !self.minimap.is_visible() || self.guard.active_origin(now) == Some(Surface::Secondary)
        {
            return;
        }
        let Some(target) = proportional_target(self.host.primary_metrics(), self.minimap.metrics())
        else {
            return;
        };
        tracing::trace!("Minimap offset -> {:.2}", target);
        if self.minimap.set_offset(target) {
            self.echoes.push_back(ControllerEvent::SecondaryScrolled);
        }
    }

    /// Mirror the minimap's scroll ratio onto the host (instant scroll)
    pub fn sync_primary_from_secondary(&mut self, now: Instant) {
        if !self.minimap.is_visible() || self.guard.active_origin(now) == Some(Surface::Primary) {
            return;
        }
        let before = self.host.primary_metrics();
        let Some(target) = proportional_target(self.minimap.metrics(), before) else {
            return;
        };
        tracing::trace!("Host offset -> {:.2}", target);
        self.host.scroll_primary_to(target);
        if (self.host.primary_metrics().offset - before.offset).abs() > f64::EPSILON {
            self.echoes.push_back(ControllerEvent::PrimaryScrolled);
        }
    }

    /// User-driven minimap scroll; raises a secondary scroll event if it moved
    pub fn scroll_secondary_to(&mut self, offset: f64, now: Instant) {
        if self.phase != Phase::Live || !self.minimap.is_visible() {
            return;
        }
        if self.minimap.set_offset(offset) {
            self.dispatch(ControllerEvent::SecondaryScrolled, now);
        }
    }

    pub fn scroll_secondary_by(&mut self, delta: f64, now: Instant) {
        let offset = self.minimap.offset() + delta;
        self.scroll_secondary_to(offset, now);
    }

    /// Move the cursor and bring the target message into view
    ///
    /// Returns the new cursor position, or `None` when the index is empty.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        if self.phase != Phase::Live {
            return None;
        }
        let position = self.cursor.step(direction, self.index.len())?;
        let id = self.index.get(position)?.id;
        self.host.scroll_into_view(id, ScrollBehavior::Smooth);
        self.highlight(Some(id));
        Some(position)
    }

    /// Excerpt of the message `navigate(direction)` would select
    pub fn preview_adjacent(&self, direction: Direction) -> Option<String> {
        let position = self.cursor.target(direction, self.index.len())?;
        let entry = self.index.get(position)?;
        Some(excerpt(&entry.text, self.config.preview_chars))
    }

    /// Excerpt for a hovered block; only user blocks have one
    pub fn block_preview(&self, position: usize) -> Option<String> {
        let block = self.minimap.block(position)?;
        let entry = self
            .index
            .position_of(block.id)
            .and_then(|p| self.index.get(p))?;
        Some(excerpt(&entry.text, self.config.block_preview_chars))
    }

    /// Jump to the message behind a block
    ///
    /// Any block scrolls the host; user blocks also move the cursor.
    pub fn select_block(&mut self, position: usize) {
        if self.phase != Phase::Live {
            return;
        }
        let Some(id) = self.minimap.block(position).map(|block| block.id) else {
            return;
        };
        self.host.scroll_into_view(id, ScrollBehavior::Smooth);
        if let Some(index_position) = self.index.position_of(id) {
            self.cursor.select(index_position);
            self.highlight(Some(id));
        }
    }

    fn highlight(&mut self, id: Option<NodeId>) {
        self.highlighted = id;
        self.minimap.mark_current(id);
    }

    fn apply_viewport_width(&mut self, width: f64) {
        let visible = width >= self.config.min_viewport_width;
        if visible == self.minimap.is_visible() {
            return;
        }
        tracing::debug!(
            "Viewport width {} -> minimap {}",
            width,
            if visible { "shown" } else { "hidden" }
        );
        self.minimap.set_visible(visible);
        if visible {
            self.realign();
        }
    }

    /// The shell reports how tall the minimap viewport is
    pub fn set_minimap_viewport(&mut self, height: f64) {
        self.minimap.set_viewport_height(height);
    }

    /// Detach: cancel timers, drop state, remove the minimap
    pub fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.phase = Phase::Destroyed;
        self.ready_timer.cancel();
        self.rebuild_timer.cancel();
        self.guard.reset();
        self.echoes.clear();
        self.tooltip = None;
        self.highlighted = None;
        self.cursor.clear();
        self.index = MessageIndex::default();
        self.minimap.clear();
        tracing::info!("Minimap destroyed");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == Phase::Live
    }

    pub fn index(&self) -> &MessageIndex {
        &self.index
    }

    pub fn cursor(&self) -> NavigationCursor {
        self.cursor
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Previous/next controls are disabled while there is nothing to visit
    pub fn nav_enabled(&self) -> bool {
        self.is_live() && !self.index.is_empty()
    }

    pub fn rebuild_pending(&self) -> bool {
        self.rebuild_timer.is_pending()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
