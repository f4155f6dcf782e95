//! # Actions
//!
//! Everything the user can do in a browser becomes an `Action`.
//! Typing in the search box? That's `Action::FilterChanged(text)`.
//! Right arrow in the demo? That's `Action::StepForward`.
//!
//! The `update()` function applies an action to the state and returns an
//! [`Effect`] telling the adapter what to do next. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```
//!
//! Actions that don't apply to the current mode are ignored.

use std::rc::Rc;

use log::debug;

use crate::core::state::{BrowserState, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    FilterChanged(String),
    ResetFilter,
    StepForward,
    StepBackward,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Search text was cleared by the state; the adapter should clear its box.
    SearchCleared,
    Quit,
}

pub fn update(state: &mut BrowserState, action: Action) -> Effect {
    match action {
        Action::Quit => return Effect::Quit,
        Action::ScrollUp => state.scroll.scroll_by(-1),
        Action::ScrollDown => state.scroll.scroll_by(1),
        Action::PageUp => state.scroll.page_up(),
        Action::PageDown => state.scroll.page_down(),
        Action::FilterChanged(text) => {
            if let Mode::Catalog(catalog) = &mut state.mode {
                let shown = catalog.view.search(&text).len();
                debug!("Filter {:?} shows {} entries", text, shown);
                catalog.query = text;
                state.scroll.to_top();
            }
        }
        Action::ResetFilter => {
            if let Mode::Catalog(catalog) = &mut state.mode {
                catalog.view.reset();
                catalog.query.clear();
                state.scroll.to_top();
                return Effect::SearchCleared;
            }
        }
        Action::StepForward => {
            if let Mode::Samples(samples) = &mut state.mode {
                let next = Rc::clone(samples.cycle.advance());
                samples.view.replace(next);
                state.scroll.to_top();
            }
        }
        Action::StepBackward => {
            if let Mode::Samples(samples) = &mut state.mode {
                let previous = Rc::clone(samples.cycle.retreat());
                samples.view.replace(previous);
                state.scroll.to_top();
            }
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, sample};
    use std::cell::Cell;

    fn catalog() -> BrowserState {
        BrowserState::catalog(
            vec![
                record("vim", 10),
                record("visual-studio", 30),
                record("emacs", 20),
            ],
            3,
        )
    }

    fn samples(n: usize) -> BrowserState {
        let all = ["c", "go", "py", "rb", "rs", "js", "ts", "md"];
        BrowserState::samples(all.iter().cycle().take(n).map(|e| sample(e)).collect()).unwrap()
    }

    fn visible_names(state: &BrowserState) -> Vec<String> {
        match &state.mode {
            Mode::Catalog(c) => c.view.visible().iter().map(|r| r.name.clone()).collect(),
            Mode::Samples(_) => vec![],
        }
    }

    fn sample_position(state: &BrowserState) -> usize {
        match &state.mode {
            Mode::Samples(s) => s.cycle.position(),
            Mode::Catalog(_) => usize::MAX,
        }
    }

    #[test]
    fn test_quit_in_both_modes() {
        assert_eq!(update(&mut catalog(), Action::Quit), Effect::Quit);
        assert_eq!(update(&mut samples(2), Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_filter_changed_narrows_and_scrolls_to_top() {
        let mut state = catalog();
        state.scroll.set_bounds(100, 10);
        state.scroll.scroll_by(40);

        update(&mut state, Action::FilterChanged("vi".into()));

        assert_eq!(visible_names(&state), vec!["vim", "visual-studio"]);
        assert_eq!(state.scroll.offset, 0);
    }

    #[test]
    fn test_reset_clears_query() {
        let mut state = catalog();
        update(&mut state, Action::FilterChanged("emacs".into()));
        let effect = update(&mut state, Action::ResetFilter);

        assert_eq!(effect, Effect::SearchCleared);
        assert_eq!(visible_names(&state).len(), 3);
        let Mode::Catalog(c) = &state.mode else { unreachable!() };
        assert!(c.query.is_empty());
    }

    #[test]
    fn test_step_ignored_in_catalog_mode() {
        let mut state = catalog();
        assert_eq!(update(&mut state, Action::StepForward), Effect::None);
        assert_eq!(visible_names(&state).len(), 3);
    }

    #[test]
    fn test_filter_ignored_in_sample_mode() {
        let mut state = samples(3);
        assert_eq!(update(&mut state, Action::FilterChanged("x".into())), Effect::None);
        assert_eq!(update(&mut state, Action::ResetFilter), Effect::None);
        assert_eq!(sample_position(&state), 0);
    }

    #[test]
    fn test_step_forward_replaces_current_and_scrolls_to_top() {
        let mut state = samples(3);
        state.scroll.set_bounds(100, 10);
        state.scroll.page_down();

        update(&mut state, Action::StepForward);

        let Mode::Samples(s) = &state.mode else { unreachable!() };
        assert_eq!(s.view.current().extension, "go");
        assert_eq!(state.scroll.offset, 0);
    }

    #[test]
    fn test_step_backward_wraps_to_last() {
        let mut state = samples(3);
        update(&mut state, Action::StepBackward);
        let Mode::Samples(s) = &state.mode else { unreachable!() };
        assert_eq!(s.cycle.position(), 2);
        assert_eq!(s.view.current().extension, "py");
    }

    #[test]
    fn test_twenty_five_steps_over_twenty_one_samples() {
        let mut a = samples(21);
        let mut b = samples(21);
        for _ in 0..25 {
            update(&mut a, Action::StepForward);
        }
        for _ in 0..4 {
            update(&mut b, Action::StepForward);
        }
        assert_eq!(sample_position(&a), 4);
        assert_eq!(sample_position(&a), sample_position(&b));
    }

    #[test]
    fn test_page_size_is_viewport_height() {
        let mut state = samples(1);
        state.scroll.set_bounds(100, 15);
        update(&mut state, Action::PageDown);
        assert_eq!(state.scroll.offset, 15);
        update(&mut state, Action::ScrollDown);
        assert_eq!(state.scroll.offset, 16);
        update(&mut state, Action::PageUp);
        update(&mut state, Action::ScrollUp);
        assert_eq!(state.scroll.offset, 0);
    }

    #[test]
    fn test_listener_fires_on_view_changes_only() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);

        let mut state = samples(3);
        state.on_change(move || counter.set(counter.get() + 1));

        update(&mut state, Action::ScrollDown);
        update(&mut state, Action::StepForward);
        update(&mut state, Action::StepBackward);

        assert_eq!(fired.get(), 2);
    }
}
