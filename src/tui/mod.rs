//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the two
//! browsers and translates keyboard events into `core::Action` values.
//! It also owns the plain console output of the non-interactive commands
//! (`console`), which reuses the same widgets off-screen.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop blocks on the next input event and only
//! redraws when an event was handled. All pending events are drained
//! before drawing, which keeps fast typing in the search box responsive.
//!
//! Views notify listeners when their visible content changes; the adapter
//! subscribes once and drops its presentation caches (highlighted sample
//! lines, scroll view offset) on the next frame.

mod component;
pub mod components;
pub mod console;
mod event;
pub mod format;
pub mod highlight;
pub mod markdown;
pub mod theme;
mod ui;

use std::cell::Cell;
use std::io::{self, stdout};
use std::rc::Rc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use log::{debug, info};
use ratatui::DefaultTerminal;
use ratatui::text::Line;
use tui_scrollview::ScrollViewState;

use crate::core::action::{Action, Effect, update};
use crate::core::state::{BrowserState, Mode};
use crate::remote::types::{CodeSample, RepositoryRecord};
use crate::tui::component::EventHandler;
use crate::tui::components::{SearchBox, SearchEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, read_event};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub search_box: SearchBox,
    pub view_state: ScrollViewState,
    /// Highlighted lines of the current sample, computed on first draw.
    pub sample_lines: Option<Vec<Line<'static>>>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            search_box: SearchBox::new(),
            view_state: ScrollViewState::default(),
            sample_lines: None,
        }
    }

    fn invalidate(&mut self) {
        self.sample_lines = None;
        self.view_state = ScrollViewState::default();
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Interactive grid over `records` with a search box. Runs until quit.
pub fn start_catalog_browser(records: Vec<RepositoryRecord>) -> io::Result<()> {
    let total = records.len();
    run(BrowserState::catalog(records, total))
}

/// Interactive demo cycling through `samples`. Runs until quit.
/// An empty list returns immediately.
pub fn start_sample_browser(samples: Vec<CodeSample>) -> io::Result<()> {
    match BrowserState::samples(samples) {
        Some(state) => run(state),
        None => {
            info!("No samples to browse");
            Ok(())
        }
    }
}

fn run(mut state: BrowserState) -> io::Result<()> {
    let mut tui = TuiState::new();

    let content_changed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&content_changed);
    state.on_change(move || flag.set(true));

    let mut terminal = ratatui::init();
    let result = TerminalModeGuard::new()
        .and_then(|_guard| event_loop(&mut terminal, &mut state, &mut tui, &content_changed));
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut BrowserState,
    tui: &mut TuiState,
    content_changed: &Cell<bool>,
) -> io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if content_changed.replace(false) {
            tui.invalidate();
        }
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, state, tui))?;
            needs_redraw = false;
        }

        // Block for the first event, then drain everything already queued
        let mut pending = Vec::from_iter(read_event()?);
        while let Some(event) = poll_event_immediate()? {
            pending.push(event);
        }

        for event in pending {
            needs_redraw = true;
            let Some(action) = translate(&event, state, tui) else {
                continue;
            };
            match update(state, action) {
                Effect::Quit => {
                    info!("Browser closed");
                    return Ok(());
                }
                Effect::SearchCleared => tui.search_box.clear(),
                Effect::None => {}
            }
        }
    }
}

/// Map a terminal event to a core action for the current mode.
/// Catalog text input goes through the search box first.
fn translate(event: &TuiEvent, state: &BrowserState, tui: &mut TuiState) -> Option<Action> {
    let action = match (event, &state.mode) {
        (TuiEvent::Quit, _) => Some(Action::Quit),
        (TuiEvent::ScrollUp, _) => Some(Action::ScrollUp),
        (TuiEvent::ScrollDown, _) => Some(Action::ScrollDown),
        (TuiEvent::PageUp, _) => Some(Action::PageUp),
        (TuiEvent::PageDown, _) => Some(Action::PageDown),
        (TuiEvent::Resize, _) => None,

        (TuiEvent::Reset, Mode::Catalog(_)) => Some(Action::ResetFilter),
        (TuiEvent::InputChar(_) | TuiEvent::Backspace, Mode::Catalog(_)) => {
            match tui.search_box.handle_event(event) {
                Some(SearchEvent::Changed(text)) => Some(Action::FilterChanged(text)),
                None => None,
            }
        }

        (TuiEvent::InputChar('q'), Mode::Samples(_)) => Some(Action::Quit),
        (TuiEvent::Left, Mode::Samples(_)) => Some(Action::StepBackward),
        (TuiEvent::Right, Mode::Samples(_)) => Some(Action::StepForward),

        _ => None,
    };
    debug!("{:?} -> {:?}", event, action);
    action
}
