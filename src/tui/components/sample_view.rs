//! # SampleView Component
//!
//! One highlighted code sample in a bordered panel titled with its syntax.
//! Highlighting is comparatively slow, so the parent computes the lines once
//! per sample with [`numbered_lines`] and hands them in as a prop.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::ScrollPosition;
use crate::remote::types::CodeSample;
use crate::tui::component::Component;
use crate::tui::{highlight, theme};

/// Highlighted lines of `sample`, each prefixed with its line number.
pub fn numbered_lines(sample: &CodeSample) -> Vec<Line<'static>> {
    let lines = highlight::highlight(&sample.code, highlight::by_name(&sample.syntax_name));
    let digits = lines.len().max(1).to_string().len();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, mut line)| {
            line.spans.insert(
                0,
                Span::styled(
                    format!("{:>digits$} ", i + 1),
                    Style::default().fg(theme::COMMENT),
                ),
            );
            line
        })
        .collect()
}

pub struct SampleView<'a> {
    pub sample: &'a CodeSample,
    pub lines: &'a [Line<'static>],
    pub scroll: &'a mut ScrollPosition,
    pub view_state: &'a mut ScrollViewState,
}

impl Component for SampleView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::PURPLE))
            .title(Span::styled(
                format!(" {} ", self.sample.syntax_name),
                Style::default().fg(theme::PINK).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        let width = inner.width.saturating_sub(1);

        self.scroll.set_bounds(height, inner.height);
        self.view_state.set_offset(Position {
            x: 0,
            y: self.scroll.offset,
        });

        let mut scroll_view = ScrollView::new(Size::new(width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(self.lines.to_vec())
                .style(Style::default().bg(theme::BACKGROUND).fg(theme::FOREGROUND)),
            Rect::new(0, 0, width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, self.view_state);
    }
}
