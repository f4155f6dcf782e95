use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Core actions (translated to core::Action)
    Quit,
    Reset,

    // Routed by mode: search box input in the catalog, navigation in samples
    InputChar(char),
    Backspace,
    Left,
    Right,

    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Resize,
}

/// Block until the next event the browser cares about.
pub fn read_event() -> io::Result<Option<TuiEvent>> {
    Ok(translate(event::read()?))
}

/// Next pending event, without blocking.
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    if event::poll(Duration::ZERO)? {
        Ok(translate(event::read()?))
    } else {
        Ok(None)
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        // Release/repeat reports arrive when the terminal supports them
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
            match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
                (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(TuiEvent::Reset),
                (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => None,
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Esc) => Some(TuiEvent::Quit),
                (_, KeyCode::Left) => Some(TuiEvent::Left),
                (_, KeyCode::Right) => Some(TuiEvent::Right),
                (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
                (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
                (_, KeyCode::PageUp) => Some(TuiEvent::PageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::PageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Resize(..) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_ctrl_shortcuts() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Quit)
        );
        assert_eq!(
            translate(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Reset)
        );
        assert_eq!(translate(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_plain_chars_are_input() {
        assert_eq!(
            translate(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(TuiEvent::InputChar('q'))
        );
        assert_eq!(
            translate(key(KeyCode::Char('V'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('V'))
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(translate(release), None);
    }

    #[test]
    fn test_resize_requests_redraw() {
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
