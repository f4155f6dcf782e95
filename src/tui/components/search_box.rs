//! # SearchBox Component
//!
//! Single-line filter input above the catalog grid. Typing appends,
//! Backspace removes the last character; every edit emits the full text
//! so the parent can refilter.
//!
//! The buffer is internal state. Reset (Ctrl+R) is a core action, so the
//! parent calls [`SearchBox::clear`] once the core reports the search was
//! cleared.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme;

/// Rows taken by the box, borders included.
pub const SEARCH_BOX_HEIGHT: u16 = 3;

/// High-level events emitted by the SearchBox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The query text changed; carries the new text.
    Changed(String),
}

#[derive(Debug, Default)]
pub struct SearchBox {
    buffer: String,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Tail of the buffer that fits in `width` columns.
    fn visible_tail(&self, width: usize) -> &str {
        let mut used = 0;
        let mut start = self.buffer.len();
        for (idx, ch) in self.buffer.char_indices().rev() {
            used += ch.width().unwrap_or(0);
            if used > width {
                break;
            }
            start = idx;
        }
        &self.buffer[start..]
    }
}

impl Component for SearchBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // One column reserved for the cursor
        let inner = usize::from(area.width.saturating_sub(3));
        let visible = self.visible_tail(inner);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::PURPLE))
            .title("Search");
        let input = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(theme::GREEN));
        frame.render_widget(input, area);

        let cursor_x = area.x + 1 + visible.width() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

impl EventHandler for SearchBox {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                Some(SearchEvent::Changed(self.buffer.clone()))
            }
            TuiEvent::Backspace => self
                .buffer
                .pop()
                .map(|_| SearchEvent::Changed(self.buffer.clone())),
            _ => None,
        }
    }
}
