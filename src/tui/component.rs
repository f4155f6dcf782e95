use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// A piece of the browser's screen.
///
/// Components receive their data as struct fields and render into the
/// `Rect` they are given. `render` takes `&mut self` so a component can
/// keep presentation caches between frames.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent`, optionally producing a high-level event.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
