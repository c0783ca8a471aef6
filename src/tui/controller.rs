//! TUI Controller - drives AppState and TuiRenderer
//!
//! The loop drains pending terminal events, fires due timers, redraws, then
//! sleeps until the next timer deadline or the tick rate, whichever is first.

use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use crate::config::Config;

use super::app::AppState;
use super::events::EventHandler;
use super::renderer::{event_to_action, TuiRenderer};

/// Events handled per loop iteration before redrawing
const MAX_EVENTS_PER_FRAME: usize = 64;

pub struct TuiController<B: Backend> {
    state: AppState,
    renderer: TuiRenderer<B>,
    events: EventHandler,
    tick_rate: Duration,
}

impl<B: Backend> TuiController<B> {
    pub fn new(state: AppState, renderer: TuiRenderer<B>, tick_rate: Duration) -> Self {
        Self {
            state,
            renderer,
            events: EventHandler::new(MAX_EVENTS_PER_FRAME),
            tick_rate,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the main event loop
    pub async fn run(&mut self) -> Result<()> {
        while !self.state.should_quit() {
            for event in self.events.drain()? {
                if let Some(action) = event_to_action(&event, &self.state) {
                    self.state.apply(action, Instant::now());
                }
            }

            self.state.tick(Instant::now());
            self.renderer.draw(&self.state)?;

            let now = Instant::now();
            let sleep = self
                .state
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(now))
                .map_or(self.tick_rate, |until| until.min(self.tick_rate));
            tokio::time::sleep(sleep.max(Duration::from_millis(1))).await;
        }
        Ok(())
    }
}

/// Open `files` in the full-screen viewer
pub async fn run_viewer(files: Vec<PathBuf>, config: Config) -> Result<()> {
    install_panic_hook();
    let terminal = setup_terminal().context("Failed to initialize terminal")?;
    let renderer = TuiRenderer::new(terminal);
    let size = renderer.size()?;
    let tick_rate = config.tick_rate();

    let result = match AppState::new(files, config, size, Instant::now()) {
        Ok(state) => {
            let mut controller = TuiController::new(state, renderer, tick_rate);
            controller.run().await
        }
        Err(err) => Err(err),
    };

    restore_terminal()?;
    result
}

/// Install a panic hook that restores the terminal before panicking
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)?;
    Ok(())
}
