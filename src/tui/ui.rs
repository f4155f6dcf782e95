use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::{BrowserState, Mode};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::sample_view::numbered_lines;
use crate::tui::components::search_box::SEARCH_BOX_HEIGHT;
use crate::tui::components::status_bar::{CATALOG_HINTS, SAMPLE_HINTS};
use crate::tui::components::{CatalogGrid, SampleView, StatusBar};

pub fn draw_ui(frame: &mut Frame, state: &mut BrowserState, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    match &mut state.mode {
        Mode::Catalog(catalog) => {
            let layout = Layout::vertical([Length(1), Length(SEARCH_BOX_HEIGHT), Min(0), Length(1)]);
            let [title_area, search_area, body_area, footer_area] = layout.areas(frame.area());

            let visible = catalog.view.visible();
            StatusBar::header("All Apps", format!("{} of {} shown", visible.len(), catalog.total))
                .render(frame, title_area);
            tui.search_box.render(frame, search_area);
            CatalogGrid {
                records: visible,
                scroll: &mut state.scroll,
                view_state: &mut tui.view_state,
                now: Utc::now(),
            }
            .render(frame, body_area);
            StatusBar::footer(CATALOG_HINTS).render(frame, footer_area);
        }
        Mode::Samples(samples) => {
            let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
            let [title_area, body_area, footer_area] = layout.areas(frame.area());

            let sample = samples.view.current();
            let detail = format!(
                "{} · {}/{}",
                sample.file_name,
                samples.cycle.position() + 1,
                samples.cycle.len()
            );
            StatusBar::header("Theme demo", detail).render(frame, title_area);

            // Highlight once per sample; the change listener clears the cache
            let lines = tui
                .sample_lines
                .get_or_insert_with(|| numbered_lines(sample));
            SampleView {
                sample,
                lines,
                scroll: &mut state.scroll,
                view_state: &mut tui.view_state,
            }
            .render(frame, body_area);
            StatusBar::footer(SAMPLE_HINTS).render(frame, footer_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{record, sample};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_catalog_renders_cards_and_count() {
        let mut state = BrowserState::catalog(vec![record("vim", 10), record("emacs", 5)], 2);
        let mut tui = TuiState::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| draw_ui(f, &mut state, &mut tui)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("All Apps"));
        assert!(text.contains("2 of 2 shown"));
        assert!(text.contains("vim"));
        assert!(text.contains("emacs"));
    }

    #[test]
    fn test_filtered_catalog_updates_header() {
        let mut state = BrowserState::catalog(vec![record("vim", 10), record("emacs", 5)], 2);
        let mut tui = TuiState::new();
        update(&mut state, Action::FilterChanged("vi".to_string()));
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| draw_ui(f, &mut state, &mut tui)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("1 of 2 shown"));
        assert!(!text.contains("emacs"));
    }

    #[test]
    fn test_renderer_reports_scroll_bounds() {
        let records = (0..10).map(|i| record(&format!("app{i}"), i)).collect();
        let mut state = BrowserState::catalog(records, 10);
        let mut tui = TuiState::new();
        let mut terminal = Terminal::new(TestBackend::new(50, 20)).unwrap();

        terminal.draw(|f| draw_ui(f, &mut state, &mut tui)).unwrap();
        // One card per row at this width; 20 - header - search - footer
        assert_eq!(state.scroll.viewport_height, 15);
        assert_eq!(state.scroll.content_height, 120);
    }

    #[test]
    fn test_sample_mode_shows_position() {
        let mut state = BrowserState::samples(vec![sample("rs"), sample("py")]).unwrap();
        let mut tui = TuiState::new();
        update(&mut state, Action::StepForward);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        terminal.draw(|f| draw_ui(f, &mut state, &mut tui)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Theme demo"));
        assert!(text.contains("dracula.py · 2/2"));
        assert!(text.contains("PY"));
    }
}
