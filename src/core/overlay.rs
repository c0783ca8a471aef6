//! Single live controller per shell
//!
//! Re-initialization (the host navigated to another conversation) destroys
//! the previous controller before the new one starts, so listeners and
//! minimaps never pile up.

use std::time::Instant;

use super::controller::{SyncConfig, SyncController};
use super::timers::{earliest, Debounce};
use super::traits::HostDocument;

/// Holds at most one live [`SyncController`]
pub struct OverlaySlot<H: HostDocument> {
    config: SyncConfig,
    current: Option<SyncController<H>>,
    location: Option<String>,
    reinit: Debounce,
}

impl<H: HostDocument> OverlaySlot<H> {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            reinit: Debounce::new(config.reinit_delay),
            config,
            current: None,
            location: None,
        }
    }

    /// Destroy the live controller (if any) and start a new one on `host`
    pub fn install(&mut self, host: H, location: impl Into<String>, now: Instant) {
        if let Some(mut previous) = self.current.take() {
            previous.destroy();
        }
        let location = location.into();
        tracing::info!("Initializing minimap for {}", location);
        let mut controller = SyncController::new(host, self.config.clone());
        controller.start(now);
        self.current = Some(controller);
        self.location = Some(location);
        self.reinit.cancel();
    }

    /// Report the host's current location
    ///
    /// A change schedules re-initialization after the configured delay.
    /// Returns whether the location changed.
    pub fn observe_location(&mut self, location: &str, now: Instant) -> bool {
        if self.location.as_deref() == Some(location) {
            return false;
        }
        tracing::debug!("Location changed to {}", location);
        self.location = Some(location.to_string());
        self.reinit.schedule(now);
        true
    }

    /// Fire due timers, re-initializing through `make_host` when due
    pub fn tick<F>(&mut self, now: Instant, make_host: F)
    where
        F: FnOnce(&str) -> H,
    {
        if self.reinit.fire_if_due(now) {
            if let Some(location) = self.location.clone() {
                let host = make_host(&location);
                self.install(host, location, now);
            }
        }
        if let Some(controller) = self.current.as_mut() {
            controller.tick(now);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.reinit.deadline(),
            self.current.as_ref().and_then(|c| c.next_deadline()),
        ])
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn reinit_pending(&self) -> bool {
        self.reinit.is_pending()
    }

    pub fn current(&self) -> Option<&SyncController<H>> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut SyncController<H>> {
        self.current.as_mut()
    }

    /// Destroy the live controller and forget the location
    pub fn clear(&mut self) {
        if let Some(mut previous) = self.current.take() {
            previous.destroy();
        }
        self.location = None;
        self.reinit.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MessageNode, NodeId, ScrollBehavior, ScrollMetrics};
    use std::time::Duration;

    struct NamedHost {
        name: String,
    }

    impl HostDocument for NamedHost {
        fn is_ready(&self) -> bool {
            true
        }

        fn message_nodes(&self) -> Vec<MessageNode> {
            vec![MessageNode::user(1, self.name.clone())]
        }

        fn primary_metrics(&self) -> ScrollMetrics {
            ScrollMetrics::default()
        }

        fn scroll_primary_to(&mut self, _offset: f64) {}

        fn scroll_into_view(&mut self, _id: NodeId, _behavior: ScrollBehavior) {}

        fn viewport_width(&self) -> f64 {
            1024.0
        }
    }

    fn host(name: &str) -> NamedHost {
        NamedHost {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_install_replaces_live_controller() {
        let now = Instant::now();
        let mut slot = OverlaySlot::new(SyncConfig::default());
        slot.install(host("a"), "a", now);
        slot.install(host("b"), "b", now);

        let current = slot.current().map(|c| c.host().name.as_str());
        assert_eq!(current, Some("b"));
        assert_eq!(slot.location(), Some("b"));
    }

    #[test]
    fn test_location_change_reinitializes_after_delay() {
        let now = Instant::now();
        let mut slot = OverlaySlot::new(SyncConfig::default());
        slot.install(host("a"), "a", now);

        assert!(!slot.observe_location("a", now));
        assert!(slot.observe_location("b", now));

        slot.tick(now + Duration::from_millis(500), host);
        assert_eq!(slot.current().map(|c| c.host().name.as_str()), Some("a"));

        slot.tick(now + Duration::from_millis(1000), host);
        assert_eq!(slot.current().map(|c| c.host().name.as_str()), Some("b"));
        assert!(slot.current().is_some_and(|c| c.is_live()));
        assert!(!slot.reinit_pending());
    }

    #[test]
    fn test_rapid_location_changes_coalesce() {
        let now = Instant::now();
        let mut slot = OverlaySlot::new(SyncConfig::default());
        slot.install(host("a"), "a", now);
        slot.observe_location("b", now);
        slot.observe_location("c", now + Duration::from_millis(600));

        let mut built = Vec::new();
        slot.tick(now + Duration::from_millis(1000), |loc| {
            built.push(loc.to_string());
            host(loc)
        });
        assert!(built.is_empty());

        slot.tick(now + Duration::from_millis(1600), |loc| {
            built.push(loc.to_string());
            host(loc)
        });
        assert_eq!(built, vec!["c".to_string()]);
    }
}
