//! # Repository Cards
//!
//! Two presentations of a `RepositoryRecord`:
//!
//! - [`RepoCard`]: the fixed-size panel tiled by the catalog grid (TUI and
//!   plain `all` output share it).
//! - [`DetailCard`]: the wider panel `show` prints, with the description as
//!   title, the theme page as subtitle and a contributors line.
//!
//! Both are plain ratatui `Widget`s so they can render into a frame, a
//! `ScrollView` canvas or an off-screen buffer alike.

use chrono::{DateTime, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::remote::FetchError;
use crate::remote::types::{Contributor, RepositoryRecord};
use crate::tui::{format, theme};

/// Outer width of a catalog card, borders included.
pub const CARD_WIDTH: u16 = 46;
/// Ten data lines plus the border.
pub const CARD_HEIGHT: u16 = 12;

const CONTRIBUTORS_PREFIX: &str = "😀 Contributors: ";

/// Theme page for an app.
pub fn theme_page(app: &str) -> String {
    format!("https://draculatheme.com/{app}")
}

fn field(icon: &str, label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{icon} {label}: "), Style::default().fg(theme::PURPLE)),
        Span::styled(value, Style::default().fg(theme::FOREGROUND)),
    ])
}

fn timestamp(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(theme::FOREGROUND)))
}

/// The ten metadata lines shared by both cards.
pub fn card_lines(record: &RepositoryRecord, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let license = record
        .license
        .as_ref()
        .map(|l| l.name.clone())
        .unwrap_or_else(|| "Not Specified".to_string());

    vec![
        field("🤏", "Size", format::natural_size(record.size)),
        field("⭐", "Stars", format::thousands(record.stars)),
        field("🍴", "Forks", format::thousands(record.forks)),
        field("👀", "Watchers", format::thousands(record.watchers)),
        field("🔤", "Language", format::language(record.language.as_deref())),
        field("🐛", "Issues Open", format::thousands(record.open_issues)),
        field("📜", "License", license),
        timestamp(format::timestamp_line("Created At", record.created_at, now, false)),
        timestamp(format::timestamp_line("Last updated", record.updated_at, now, true)),
        timestamp(format::timestamp_line("Last pushed", record.pushed_at, now, true)),
    ]
}

/// Catalog panel, titled with the repository name.
pub struct RepoCard {
    title: String,
    lines: Vec<Line<'static>>,
}

impl RepoCard {
    pub fn new(record: &RepositoryRecord, now: DateTime<Utc>) -> Self {
        Self {
            title: record.name.clone(),
            lines: card_lines(record, now),
        }
    }
}

impl Widget for RepoCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_style(Style::default().fg(theme::COMMENT))
            .title(Span::styled(
                self.title,
                Style::default().fg(theme::PINK).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center);
        Paragraph::new(self.lines).block(block).render(area, buf);
    }
}

/// Contributors wrapped to `width` columns: names in orange, separators in red.
///
/// A failed lookup renders as a single error line instead.
pub fn contributors_lines(
    contributors: &Result<Vec<Contributor>, FetchError>,
    width: usize,
) -> Vec<Line<'static>> {
    let contributors = match contributors {
        Ok(list) => list,
        Err(e) => {
            let text = match e.status() {
                Some(status) => format!("Could not get contributors, Error {status}: {}", e.message()),
                None => format!("Could not get contributors, {}", e.message()),
            };
            return textwrap::wrap(&text, width.max(1))
                .into_iter()
                .map(|piece| Line::from(Span::styled(piece.into_owned(), Style::default().fg(theme::RED))))
                .collect();
        }
    };

    let names: Vec<&str> = contributors.iter().map(|c| c.login.as_str()).collect();
    let text = format!("{CONTRIBUTORS_PREFIX}{}", names.join(", "));
    textwrap::wrap(&text, width.max(1))
        .into_iter()
        .map(|piece| contributor_line(&piece))
        .collect()
}

fn contributor_line(piece: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let names = match piece.strip_prefix(CONTRIBUTORS_PREFIX.trim_end()) {
        Some(rest) => {
            spans.push(Span::styled(
                CONTRIBUTORS_PREFIX.trim_end().to_string(),
                Style::default().fg(theme::PURPLE),
            ));
            rest
        }
        None => piece,
    };
    for (i, name) in names.split(',').enumerate() {
        if i > 0 {
            spans.push(Span::styled(",", Style::default().fg(theme::RED)));
        }
        if !name.is_empty() {
            spans.push(Span::styled(name.to_string(), Style::default().fg(theme::ORANGE)));
        }
    }
    Line::from(spans)
}

/// `show`'s panel: metadata, contributors, description title and theme page subtitle.
pub struct DetailCard {
    title: String,
    subtitle: String,
    lines: Vec<Line<'static>>,
}

impl DetailCard {
    /// Card no wider than `max_width` columns, borders included.
    pub fn new(
        record: &RepositoryRecord,
        contributors: &Result<Vec<Contributor>, FetchError>,
        now: DateTime<Utc>,
        max_width: u16,
    ) -> Self {
        let inner = usize::from(max_width.saturating_sub(4)).max(20);
        let mut lines = card_lines(record, now);
        lines.extend(contributors_lines(contributors, inner));
        Self {
            title: record.description.clone().unwrap_or_default(),
            subtitle: theme_page(&record.name),
            lines,
        }
    }

    pub fn height(&self) -> u16 {
        self.lines.len() as u16 + 2
    }

    /// Narrowest width that fits the content, capped at `max_width`.
    pub fn width(&self, max_width: u16) -> u16 {
        let content = self
            .lines
            .iter()
            .map(Line::width)
            .chain([self.title.width(), self.subtitle.width()])
            .max()
            .unwrap_or(0);
        (content as u16).saturating_add(4).min(max_width)
    }
}

impl Widget for DetailCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_style(Style::default().fg(theme::CYAN))
            .title_top(Line::from(self.title).centered())
            .title_bottom(Line::from(self.subtitle).centered());
        Paragraph::new(self.lines)
            .block(block)
            .style(Style::default().fg(theme::FOREGROUND))
            .render(area, buf);
    }
}
