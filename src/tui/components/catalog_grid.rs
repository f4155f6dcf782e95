//! # CatalogGrid Component
//!
//! Tiles repository cards left to right, top to bottom, as many columns as
//! the width allows. The TUI renders the grid inside a `ScrollView`; the
//! plain `all` command renders the same [`CardGrid`] widget off-screen and
//! prints it.
//!
//! Only card rows that intersect the viewport are rendered, so a catalog
//! of a few hundred cards costs the same per frame as a screenful.

use std::ops::Range;

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::ScrollPosition;
use crate::remote::types::RepositoryRecord;
use crate::tui::component::Component;
use crate::tui::components::repo_card::{CARD_HEIGHT, CARD_WIDTH, RepoCard};
use crate::tui::theme;

/// Cards per row for a grid `width` columns wide (at least one).
pub fn columns(width: u16) -> u16 {
    (width / CARD_WIDTH).max(1)
}

fn row_count(cards: usize, columns: u16) -> usize {
    cards.div_ceil(usize::from(columns.max(1)))
}

/// Total height of `cards` laid out in `columns`.
pub fn grid_height(cards: usize, columns: u16) -> u16 {
    let rows = u16::try_from(row_count(cards, columns)).unwrap_or(u16::MAX);
    rows.saturating_mul(CARD_HEIGHT)
}

/// Rows of cards visible when the viewport starts `offset` lines down.
fn visible_rows(offset: u16, viewport: u16, total_rows: usize) -> Range<usize> {
    let first = usize::from(offset / CARD_HEIGHT);
    let last = usize::from(offset.saturating_add(viewport).div_ceil(CARD_HEIGHT));
    first.min(total_rows)..last.min(total_rows)
}

/// Cards laid out on a grid, restricted to a range of rows.
pub struct CardGrid<'a> {
    records: &'a [RepositoryRecord],
    now: DateTime<Utc>,
    rows: Range<usize>,
}

impl<'a> CardGrid<'a> {
    /// Every row of `records`.
    pub fn new(records: &'a [RepositoryRecord], now: DateTime<Utc>) -> Self {
        Self {
            records,
            now,
            rows: 0..usize::MAX,
        }
    }

    pub fn rows(mut self, rows: Range<usize>) -> Self {
        self.rows = rows;
        self
    }
}

impl Widget for CardGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = columns(area.width);
        for (index, record) in self.records.iter().enumerate() {
            let row = index / usize::from(cols);
            if !self.rows.contains(&row) {
                continue;
            }
            let col = (index % usize::from(cols)) as u16;
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            let y = area.y.saturating_add(row.saturating_mul(CARD_HEIGHT));
            let card = Rect::new(area.x + col * CARD_WIDTH, y, CARD_WIDTH, CARD_HEIGHT);
            let card = card.intersection(area);
            if !card.is_empty() {
                RepoCard::new(record, self.now).render(card, buf);
            }
        }
    }
}

/// Scrollable catalog body for the TUI.
pub struct CatalogGrid<'a> {
    pub records: &'a [RepositoryRecord],
    pub scroll: &'a mut ScrollPosition,
    pub view_state: &'a mut ScrollViewState,
    pub now: DateTime<Utc>,
}

impl Component for CatalogGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.records.is_empty() {
            self.scroll.set_bounds(0, area.height);
            let empty = Paragraph::new("No apps match the search")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme::COMMENT));
            frame.render_widget(empty, area);
            return;
        }

        // Last column belongs to the scrollbar
        let content_width = area.width.saturating_sub(1);
        let cols = columns(content_width);
        let height = grid_height(self.records.len(), cols);

        self.scroll.set_bounds(height, area.height);
        self.view_state.set_offset(Position {
            x: 0,
            y: self.scroll.offset,
        });

        let rows = visible_rows(
            self.scroll.offset,
            area.height,
            row_count(self.records.len(), cols),
        );
        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            CardGrid::new(self.records, self.now).rows(rows),
            Rect::new(0, 0, content_width, height),
        );
        frame.render_stateful_widget(scroll_view, area, self.view_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_columns_fit_width() {
        assert_eq!(columns(10), 1);
        assert_eq!(columns(CARD_WIDTH * 2), 2);
        assert_eq!(columns(CARD_WIDTH * 3 - 1), 2);
    }

    #[test]
    fn test_grid_height_rounds_up_rows() {
        assert_eq!(grid_height(0, 2), 0);
        assert_eq!(grid_height(3, 2), 2 * CARD_HEIGHT);
        assert_eq!(grid_height(4, 2), 2 * CARD_HEIGHT);
    }

    #[test]
    fn test_visible_rows_window() {
        assert_eq!(visible_rows(0, CARD_HEIGHT, 5), 0..1);
        assert_eq!(visible_rows(CARD_HEIGHT + 1, CARD_HEIGHT, 5), 1..3);
        assert_eq!(visible_rows(0, 1000, 5), 0..5);
    }

    #[test]
    fn test_card_grid_places_titles() {
        let records = vec![record("vim", 1), record("emacs", 2), record("zsh", 3)];
        let area = Rect::new(0, 0, CARD_WIDTH * 2, CARD_HEIGHT * 2);
        let mut buf = Buffer::empty(area);
        CardGrid::new(&records, Utc::now()).render(area, &mut buf);

        let row = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(0).contains("vim"));
        assert!(row(0).contains("emacs"));
        assert!(row(CARD_HEIGHT).contains("zsh"));
    }
}
