//! Markdown → ratatui `Text` renderer for install guides and readmes.
//!
//! Walks `pulldown_cmark` events and emits Dracula-styled lines. Fenced code
//! blocks are highlighted with syntect; raw HTML is dropped, images become
//! their alt text.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::util::LinesWithEndings;

use crate::tui::highlight::{self, Highlighter};
use crate::tui::theme;

pub fn render(content: &str) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);

    let mut w = Writer::default();
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

fn base() -> Style {
    Style::default().fg(theme::FOREGROUND)
}

fn muted() -> Style {
    Style::default().fg(theme::COMMENT)
}

#[derive(Default)]
struct Writer {
    text: Text<'static>,
    /// Inline styles, composed with `patch`.
    styles: Vec<Style>,
    /// Blockquote bars prepended to every new line.
    prefixes: Vec<Span<'static>>,
    /// None = bullet list, Some(n) = ordered list at n.
    lists: Vec<Option<u64>>,
    code: Option<Highlighter>,
    link: Option<String>,
    /// Alt text of an image in progress.
    image: Option<String>,
    table_cell: usize,
    pending_blank: bool,
}

impl Writer {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_else(base)
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn new_line(&mut self, mut line: Line<'static>) {
        for prefix in self.prefixes.iter().rev() {
            line.spans.insert(0, prefix.clone());
        }
        self.text.lines.push(line);
    }

    fn span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(Line::from(span)),
        }
    }

    fn block_gap(&mut self) {
        if self.pending_blank {
            self.new_line(Line::default());
            self.pending_blank = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.span(Span::styled(
                c.to_string(),
                Style::default().fg(theme::GREEN).bg(theme::CURRENT_LINE),
            )),
            Event::SoftBreak => self.span(Span::raw(" ")),
            Event::HardBreak => self.new_line(Line::default()),
            Event::Rule => {
                self.block_gap();
                self.new_line(Line::from(Span::styled("─".repeat(40), muted())));
                self.pending_blank = true;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.block_gap();
                self.new_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.block_gap();
                let style = heading_style(level);
                self.new_line(Line::default());
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.block_gap();
                self.prefixes.push(Span::styled("▌ ", Style::default().fg(theme::PURPLE)));
                self.push_style(muted().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.block_gap();
                let token = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
                    CodeBlockKind::Indented => "",
                };
                self.code = Some(Highlighter::new(highlight::for_token(token)));
                self.prefixes.push(Span::styled("  ", base()));
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.new_line(Line::default());
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.span(Span::styled(marker, Style::default().fg(theme::PINK)));
            }
            Tag::Table(_) => self.block_gap(),
            Tag::TableHead | Tag::TableRow => {
                self.new_line(Line::default());
                self.table_cell = 0;
            }
            Tag::TableCell => {
                if self.table_cell > 0 {
                    self.span(Span::styled(" │ ", muted()));
                }
                self.table_cell += 1;
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(theme::CYAN)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Image { .. } => self.image = Some(String::new()),
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Table => self.pending_blank = true,
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.pending_blank = true;
            }
            TagEnd::BlockQuote(_) => {
                self.prefixes.pop();
                self.styles.pop();
                self.pending_blank = true;
            }
            TagEnd::CodeBlock => {
                self.code = None;
                self.prefixes.pop();
                self.pending_blank = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.pending_blank = true;
                }
            }
            TagEnd::TableHead => {
                if let Some(line) = self.text.lines.last_mut() {
                    for span in &mut line.spans {
                        span.style = span.style.add_modifier(Modifier::BOLD);
                    }
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                // Autolinks already show the URL as their text
                if let Some(url) = self.link.take() {
                    let shown = self.text.lines.last().is_some_and(|line| {
                        line.spans.last().is_some_and(|s| s.content == url.as_str())
                    });
                    if !shown {
                        self.span(Span::styled(format!(" ({url})"), muted()));
                    }
                }
            }
            TagEnd::Image => {
                if let Some(alt) = self.image.take() {
                    let label = if alt.is_empty() { "image".to_string() } else { alt };
                    self.span(Span::styled(
                        format!("🖼 {label}"),
                        Style::default().fg(theme::PURPLE),
                    ));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        if let Some(alt) = self.image.as_mut() {
            alt.push_str(&cow);
            return;
        }

        if let Some(mut code) = self.code.take() {
            for line in LinesWithEndings::from(&cow) {
                let highlighted = code.line(line);
                self.new_line(highlighted);
            }
            self.code = Some(code);
            return;
        }

        let style = self.style();
        self.span(Span::styled(cow.replace('\t', "    "), style));
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.fg(theme::PURPLE).add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style.fg(theme::PURPLE),
        HeadingLevel::H3 => style.fg(theme::PINK),
        _ => style.fg(theme::PINK).add_modifier(Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_heading_text_is_styled() {
        let text = render("## Install");
        let span = text.lines[0].spans.iter().find(|s| s.content == "Install").unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(span.style.fg, Some(theme::PURPLE));
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let lines = plain(&render("one\n\ntwo"));
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn test_ordered_list_numbers() {
        let lines = plain(&render("1. clone\n2. copy"));
        assert_eq!(lines, vec!["1. clone", "2. copy"]);
    }

    #[test]
    fn test_code_block_keeps_lines() {
        let lines = plain(&render("```sh\ngit clone x\ncd x\n```"));
        assert_eq!(lines, vec!["  git clone x", "  cd x"]);
    }

    #[test]
    fn test_link_url_appended() {
        let lines = plain(&render("[site](https://draculatheme.com)"));
        assert_eq!(lines[0], "site (https://draculatheme.com)");
    }

    #[test]
    fn test_image_becomes_alt_text() {
        let lines = plain(&render("![Screenshot](./screenshot.png)"));
        assert_eq!(lines[0], "🖼 Screenshot");
    }

    #[test]
    fn test_html_is_dropped() {
        let lines = plain(&render("<p align=\"center\">hi</p>\n\ntext"));
        assert!(lines.iter().all(|l| !l.contains("<p")));
        assert!(lines.iter().any(|l| l == "text"));
    }

    #[test]
    fn test_table_cells_joined() {
        let lines = plain(&render("| a | b |\n|---|---|\n| 1 | 2 |"));
        assert_eq!(lines, vec!["a │ b", "1 │ 2"]);
    }
}
