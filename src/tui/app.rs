//! Viewer state
//!
//! Everything the viewer knows, independent of the terminal: the open files,
//! the live minimap controller, the file watcher and the current layout.
//! Input arrives as [`Action`]s; time only advances through `now` arguments.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::core::timers::earliest;
use crate::core::{ControllerEvent, Direction, OverlaySlot, SyncController};
use crate::transcript::{Transcript, TranscriptWatcher};

use super::layout::{HitTarget, ViewLayout};

/// Something the pointer can rest on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Nav(Direction),
    Block(usize),
}

/// User intents produced by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    /// Scroll the transcript by a number of lines
    ScrollTranscript(f64),
    /// Scroll the transcript by pages
    PageTranscript(f64),
    TranscriptTop,
    TranscriptBottom,
    /// Scroll the minimap by a number of rows
    ScrollMinimap(f64),
    SwitchFile(Direction),
    Click { x: u16, y: u16 },
    PointerMoved { x: u16, y: u16 },
    Resize { width: u16, height: u16 },
}

/// Empty transcript sized for a terminal without the minimap
fn open_transcript(config: &Config, location: &str, size: (u16, u16)) -> Transcript {
    let layout = ViewLayout::compute(Rect::new(0, 0, size.0, size.1), false, 0);
    let mut transcript = Transcript::new(location).with_smooth_scroll(config.smooth_scroll());
    transcript.set_viewport(
        size.0,
        usize::from(layout.transcript.width),
        usize::from(layout.transcript.height),
    );
    transcript
}

/// State of the running viewer
pub struct AppState {
    config: Config,
    files: Vec<PathBuf>,
    active: usize,
    slot: OverlaySlot<Transcript>,
    watcher: TranscriptWatcher,
    size: (u16, u16),
    layout: ViewLayout,
    hovered: Option<HoverTarget>,
    notice: Option<String>,
    should_quit: bool,
}

impl AppState {
    /// Open the first file and attach a controller to it
    pub fn new(files: Vec<PathBuf>, config: Config, size: (u16, u16), now: Instant) -> Result<Self> {
        let Some(first) = files.first().cloned() else {
            bail!("No transcript files given");
        };

        let mut state = Self {
            slot: OverlaySlot::new(config.to_sync_config()),
            watcher: TranscriptWatcher::new(&first, config.poll_interval()),
            config,
            files,
            active: 0,
            size,
            layout: ViewLayout::default(),
            hovered: None,
            notice: None,
            should_quit: false,
        };

        let location = first.display().to_string();
        let mut transcript = open_transcript(&state.config, &location, state.size);
        if let Err(err) = state.watcher.poll(&mut transcript, now) {
            tracing::warn!("{}", err);
            state.notice = Some(err.to_string());
        }
        state.slot.install(transcript, location, now);
        state.relayout();
        Ok(state)
    }

    fn screen(&self) -> Rect {
        Rect::new(0, 0, self.size.0, self.size.1)
    }

    fn minimap_visible(&self) -> bool {
        self.controller()
            .is_some_and(|controller| controller.minimap().is_visible())
    }

    /// Recompute the layout and push the new geometry to both surfaces
    fn relayout(&mut self) {
        let layout = ViewLayout::compute(
            self.screen(),
            self.minimap_visible(),
            self.config.minimap.column_width,
        );
        let changed = layout != self.layout;
        self.layout = layout;
        let width = self.size.0;

        if let Some(controller) = self.slot.current_mut() {
            controller.host_mut().set_viewport(
                width,
                usize::from(layout.transcript.width),
                usize::from(layout.transcript.height),
            );
            let blocks_height = layout.minimap.map_or(0, |minimap| minimap.blocks.height);
            controller.set_minimap_viewport(f64::from(blocks_height));
            if changed {
                controller.resync();
            }
        }
    }

    /// Fire timers, read the file and advance animations
    pub fn tick(&mut self, now: Instant) {
        let config = &self.config;
        let size = self.size;
        self.slot
            .tick(now, |location| open_transcript(config, location, size));

        let Some(controller) = self.slot.current_mut() else {
            return;
        };

        let location = controller.host().location().to_string();
        if self.watcher.path() != Path::new(&location) {
            tracing::debug!("Watching {}", location);
            self.watcher = TranscriptWatcher::new(&location, self.config.poll_interval());
            self.hovered = None;
            self.notice = None;
        }

        match self.watcher.poll(controller.host_mut(), now) {
            Ok(mutations) if !mutations.is_empty() => {
                controller.dispatch(ControllerEvent::Mutations(mutations), now);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("{}", err);
                self.notice = Some(err.to_string());
            }
        }

        if controller.host_mut().advance_scroll(now) {
            controller.dispatch(ControllerEvent::PrimaryScrolled, now);
        }

        // Attaching may have shown the minimap
        if self.minimap_visible() != self.layout.minimap.is_some() {
            self.relayout();
        }
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let animating = self
            .controller()
            .is_some_and(|controller| controller.host().is_animating());
        if animating {
            return Some(Instant::now());
        }
        earliest([self.slot.next_deadline(), self.watcher.next_deadline()])
    }

    pub fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Navigate(direction) => {
                if let Some(controller) = self.slot.current_mut() {
                    controller.dispatch(ControllerEvent::NavPressed(direction), now);
                }
            }
            Action::ScrollTranscript(lines) => self.scroll_transcript(now, |t| t.scroll_by(lines)),
            Action::PageTranscript(pages) => {
                let page = f64::from(self.layout.transcript.height.saturating_sub(1).max(1));
                self.scroll_transcript(now, |t| t.scroll_by(pages * page));
            }
            Action::TranscriptTop => self.scroll_transcript(now, Transcript::scroll_to_top),
            Action::TranscriptBottom => self.scroll_transcript(now, Transcript::scroll_to_bottom),
            Action::ScrollMinimap(rows) => {
                if let Some(controller) = self.slot.current_mut() {
                    controller.scroll_secondary_by(rows, now);
                }
            }
            Action::SwitchFile(direction) => self.switch_file(direction, now),
            Action::Click { x, y } => self.click(x, y, now),
            Action::PointerMoved { x, y } => self.hover(x, y, now),
            Action::Resize { width, height } => self.resize(width, height, now),
        }
    }

    fn scroll_transcript(&mut self, now: Instant, scroll: impl FnOnce(&mut Transcript) -> bool) {
        if let Some(controller) = self.slot.current_mut() {
            if scroll(controller.host_mut()) {
                controller.dispatch(ControllerEvent::PrimaryScrolled, now);
            }
        }
    }

    fn switch_file(&mut self, direction: Direction, now: Instant) {
        if self.files.len() < 2 {
            return;
        }
        let len = self.files.len();
        self.active = match direction {
            Direction::Next => (self.active + 1) % len,
            Direction::Previous => (self.active + len - 1) % len,
        };
        let location = self.files[self.active].display().to_string();
        if self.slot.observe_location(&location, now) {
            self.notice = Some(format!("Opening {}", location));
        }
    }

    fn block_under(&self, row: u16) -> Option<usize> {
        self.controller()?.minimap().block_at(f64::from(row))
    }

    fn click(&mut self, x: u16, y: u16, now: Instant) {
        let event = match self.layout.hit_test(x, y) {
            HitTarget::Nav(direction) => ControllerEvent::NavPressed(direction),
            HitTarget::BlockRow(row) => match self.block_under(row) {
                Some(position) => ControllerEvent::BlockClicked(position),
                None => return,
            },
            _ => return,
        };
        if let Some(controller) = self.slot.current_mut() {
            controller.dispatch(event, now);
        }
    }

    fn hover(&mut self, x: u16, y: u16, now: Instant) {
        let target = match self.layout.hit_test(x, y) {
            HitTarget::Nav(direction) => Some(HoverTarget::Nav(direction)),
            HitTarget::BlockRow(row) => self.block_under(row).map(HoverTarget::Block),
            _ => None,
        };
        if target == self.hovered {
            return;
        }
        self.hovered = target;

        let event = match target {
            Some(HoverTarget::Nav(direction)) => ControllerEvent::NavHovered(direction),
            Some(HoverTarget::Block(position)) => ControllerEvent::BlockHovered(position),
            None => ControllerEvent::PointerLeft,
        };
        if let Some(controller) = self.slot.current_mut() {
            controller.dispatch(event, now);
        }
    }

    fn resize(&mut self, width: u16, height: u16, now: Instant) {
        self.size = (width, height);
        self.relayout();
        if let Some(controller) = self.slot.current_mut() {
            controller.dispatch(
                ControllerEvent::Resized {
                    width: f64::from(width),
                },
                now,
            );
        }
        self.relayout();
    }

    pub fn controller(&self) -> Option<&SyncController<Transcript>> {
        self.slot.current()
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hovered(&self) -> Option<HoverTarget> {
        self.hovered
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn active_file(&self) -> usize {
        self.active
    }

    /// A file switch is waiting for its delay to elapse
    pub fn reinit_pending(&self) -> bool {
        self.slot.reinit_pending()
    }
}
