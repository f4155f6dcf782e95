//! # StatusBar Component
//!
//! One-line bars above and below the browser body. Purely presentational:
//! the header shows the screen title and a position summary, the footer
//! shows the key hints for the current mode.
//!
//! ```rust,ignore
//! StatusBar::header("All Apps", "12 of 230 shown").render(frame, title_area);
//! StatusBar::footer(CATALOG_HINTS).render(frame, footer_area);
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::theme;

pub const CATALOG_HINTS: &[(&str, &str)] = &[
    ("type", "search"),
    ("Ctrl+R", "reset"),
    ("↑↓ PgUp PgDn", "scroll"),
    ("Esc", "quit"),
];

pub const SAMPLE_HINTS: &[(&str, &str)] = &[
    ("←→", "language"),
    ("↑↓ PgUp PgDn", "scroll"),
    ("q", "quit"),
];

pub enum StatusBar<'a> {
    Header { title: &'a str, detail: String },
    Footer { hints: &'a [(&'a str, &'a str)] },
}

impl<'a> StatusBar<'a> {
    pub fn header(title: &'a str, detail: impl Into<String>) -> Self {
        StatusBar::Header {
            title,
            detail: detail.into(),
        }
    }

    pub fn footer(hints: &'a [(&'a str, &'a str)]) -> Self {
        StatusBar::Footer { hints }
    }
}

fn bar_style() -> Style {
    Style::default().bg(theme::CURRENT_LINE).fg(theme::FOREGROUND)
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self {
            StatusBar::Header { title, detail } => {
                let detail_width = u16::try_from(detail.width() + 1).unwrap_or(u16::MAX);
                let [left, right] =
                    Layout::horizontal([Constraint::Min(0), Constraint::Length(detail_width)])
                        .areas(area);
                let title = Paragraph::new(Line::from(vec![
                    Span::styled(" 🧛 ", bar_style()),
                    Span::styled(
                        title.to_string(),
                        bar_style().fg(theme::PURPLE).add_modifier(Modifier::BOLD),
                    ),
                ]))
                .style(bar_style());
                frame.render_widget(title, left);
                frame.render_widget(
                    Paragraph::new(detail.as_str())
                        .style(bar_style().fg(theme::COMMENT))
                        .right_aligned(),
                    right,
                );
            }
            StatusBar::Footer { hints } => {
                let mut spans = Vec::with_capacity(hints.len() * 3);
                for (key, action) in hints.iter() {
                    spans.push(Span::styled(
                        format!(" {key} "),
                        Style::default()
                            .bg(theme::PURPLE)
                            .fg(theme::BACKGROUND)
                            .add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::styled(format!(" {action} "), bar_style()));
                }
                frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style()), area);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn first_row(width: u16, mut bar: StatusBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..width).map(|x| buffer[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_header_shows_title_and_detail() {
        let row = first_row(60, StatusBar::header("All Apps", "3 of 5 shown"));
        assert!(row.contains("All Apps"));
        assert!(row.trim_end().ends_with("3 of 5 shown"));
    }

    #[test]
    fn test_header_detail_sized_by_display_width() {
        // Title takes 12 columns and the detail 17 plus a gap, so 30 fits both
        // exactly. Sizing the detail by bytes ("·" is two) would clip the title.
        let row = first_row(30, StatusBar::header("All Apps", "dracula.rs · 1/12"));
        assert!(row.contains("All Apps"));
        assert!(row.trim_end().ends_with("dracula.rs · 1/12"));
    }

    #[test]
    fn test_footer_lists_hints() {
        let row = first_row(80, StatusBar::footer(SAMPLE_HINTS));
        assert!(row.contains("language"));
        assert!(row.contains(" q "));
    }
}
