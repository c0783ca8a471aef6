//! Scroll synchronization between the primary and secondary surfaces
//!
//! A scroll on one surface is mirrored onto the other proportionally. The
//! mirrored write raises its own scroll event on the target surface; the
//! [`SyncGuard`] swallows that echo for a short window so the two listeners
//! never ping-pong.

use std::time::{Duration, Instant};

use super::types::{ScrollMetrics, Surface};

/// Which surface, if any, currently owns synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    /// A user scroll on `origin` is being mirrored; echoes from the other
    /// surface are ignored until `until`
    Syncing { origin: Surface, until: Instant },
}

/// Loop guard: at most one origin is active at any time
#[derive(Debug, Clone)]
pub struct SyncGuard {
    state: SyncState,
    window: Duration,
}

impl SyncGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            state: SyncState::Idle,
            window,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Origin of the sync in flight at `now`
    pub fn active_origin(&self, now: Instant) -> Option<Surface> {
        match self.state {
            SyncState::Syncing { origin, until } if now < until => Some(origin),
            _ => None,
        }
    }

    /// Whether a scroll event on `surface` must be ignored
    ///
    /// It is ignored while the other surface owns the sync.
    pub fn blocks(&self, surface: Surface, now: Instant) -> bool {
        self.active_origin(now) == Some(surface.other())
    }

    /// Take ownership for `origin` and (re)start the window
    ///
    /// Returns false, leaving the state untouched, while the other surface
    /// owns the sync.
    pub fn claim(&mut self, origin: Surface, now: Instant) -> bool {
        if self.blocks(origin, now) {
            return false;
        }
        self.state = SyncState::Syncing {
            origin,
            until: now + self.window,
        };
        true
    }

    /// Return to idle once the window has elapsed
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.state {
            SyncState::Syncing { until, .. } if now >= until => {
                self.state = SyncState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            SyncState::Syncing { until, .. } => Some(until),
            SyncState::Idle => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = SyncState::Idle;
    }
}

/// Offset on `target` matching the scroll ratio of `source`
///
/// `None` when either surface does not overflow; nothing should be written
/// then.
pub fn proportional_target(source: ScrollMetrics, target: ScrollMetrics) -> Option<f64> {
    let ratio = source.ratio()?;
    let extent = target.extent();
    if extent <= 0.0 || !extent.is_finite() {
        return None;
    }
    Some((ratio * extent).clamp(0.0, extent))
}
