//! # Console Output
//!
//! Non-interactive commands (`all`, `show`, `download`) reuse the TUI's
//! widgets: they render into an off-screen `Buffer` the width of the
//! terminal and the buffer is printed line by line with crossterm styling.
//! Nothing here touches raw mode or the alternate screen, so the output
//! stays in the scrollback.
//!
//! Long output can instead be collected with [`write_widget`] /
//! [`write_line`] and handed to [`page`], which pipes it through `$PAGER`.

use std::env;
use std::io::{self, ErrorKind, Write, stderr, stdout};
use std::process::{Command, Stdio};

use crossterm::cursor::MoveToColumn;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::queue;
use log::{debug, warn};
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::theme;

/// Used when stdout is not a terminal.
const FALLBACK_WIDTH: u16 = 100;

/// `-R` keeps the colour escapes intact.
const DEFAULT_PAGER: &str = "less -R";

pub fn width() -> u16 {
    terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(FALLBACK_WIDTH)
        .max(20)
}

/// `width` x `height` rectangle centred in a terminal `total` columns wide.
pub fn centered(total: u16, width: u16, height: u16) -> Rect {
    let width = width.min(total);
    Rect::new((total - width) / 2, 0, width, height)
}

/// Render `widget` into `area` of an off-screen buffer and print it.
pub fn print_widget(widget: impl Widget, area: Rect) -> io::Result<()> {
    let mut out = stdout().lock();
    write_widget(&mut out, widget, area)?;
    out.flush()
}

/// Render `widget` into `area` of an off-screen buffer and write it to `out`.
pub fn write_widget(out: &mut impl Write, widget: impl Widget, area: Rect) -> io::Result<()> {
    let area = Rect { y: 0, ..area };
    let mut buffer = Buffer::empty(Rect::new(0, 0, area.right(), area.height));
    widget.render(area, &mut buffer);
    write_buffer(out, &buffer)
}

/// Horizontal rule with a centred title, e.g. `──── 230 Apps ────`.
pub fn rule(title: &str, width: u16) -> Line<'static> {
    let label = format!(" {title} ");
    let side = usize::from(width).saturating_sub(label.width()) / 2;
    let bar = Style::default().fg(theme::PURPLE);
    Line::from(vec![
        Span::styled("─".repeat(side), bar),
        Span::styled(label, Style::default().fg(theme::FOREGROUND)),
        Span::styled("─".repeat(side), bar),
    ])
}

pub fn print_line(line: Line<'static>) -> io::Result<()> {
    let total = width();
    print_widget(Paragraph::new(line), Rect::new(0, 0, total, 1))
}

pub fn write_line(out: &mut impl Write, line: Line<'static>, width: u16) -> io::Result<()> {
    write_widget(out, Paragraph::new(line), Rect::new(0, 0, width, 1))
}

/// Show `content` through the user's pager (`$PAGER`, else `less -R`).
/// Falls back to stdout when the pager can't be started.
pub fn page(content: &[u8]) -> io::Result<()> {
    let command = pager_command(env::var("PAGER").ok().as_deref());
    page_with(&command, content, &mut stdout().lock())
}

/// Program and arguments of a pager command line. Blank means the default.
fn pager_command(configured: Option<&str>) -> Vec<String> {
    let line = configured
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_PAGER);
    line.split_whitespace().map(str::to_string).collect()
}

fn page_with(command: &[String], content: &[u8], fallback: &mut impl Write) -> io::Result<()> {
    let Some((program, args)) = command.split_first() else {
        fallback.write_all(content)?;
        return fallback.flush();
    };

    let mut child = match Command::new(program).args(args).stdin(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!("Could not start pager {}: {}", program, e);
            fallback.write_all(content)?;
            return fallback.flush();
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        // Quitting the pager early closes the pipe
        match stdin.write_all(content) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => debug!("Pager closed before end of output"),
            other => other?,
        }
    }
    let status = child.wait()?;
    debug!("Pager {} exited with {}", program, status);
    Ok(())
}

/// Wrapped text in a heavy bordered panel spanning the terminal.
pub fn print_panel(title: &str, accent: Color, text: Text<'static>) -> io::Result<()> {
    let total = width();
    let block = Block::bordered()
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });
    let height = paragraph.line_count(total);
    let height = u16::try_from(height).unwrap_or(u16::MAX);
    print_widget(paragraph, Rect::new(0, 0, total, height))
}

/// Rewrite the current stderr line with `label (done/total)`.
pub fn progress(label: &str, done: usize, total: usize) {
    let mut err = stderr().lock();
    let _ = queue!(
        err,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!("{label} ({done}/{total})"))
    );
    let _ = err.flush();
}

/// Erase the progress line.
pub fn clear_progress() {
    let mut err = stderr().lock();
    let _ = queue!(err, MoveToColumn(0), Clear(ClearType::CurrentLine));
    let _ = err.flush();
}

fn write_buffer(out: &mut impl Write, buffer: &Buffer) -> io::Result<()> {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        let row: Vec<&Cell> = (area.left()..area.right()).map(|x| &buffer[(x, y)]).collect();
        let end = row
            .iter()
            .rposition(|cell| !is_blank(cell))
            .map_or(0, |i| i + 1);

        let mut current = None;
        let mut skip = 0;
        for cell in &row[..end] {
            // Cells hidden behind a wide glyph
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let style = (cell.fg, cell.bg, cell.modifier);
            if current != Some(style) {
                write_style(out, cell)?;
                current = Some(style);
            }
            queue!(out, Print(cell.symbol()))?;
            skip = cell.symbol().width().saturating_sub(1);
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }
    Ok(())
}

fn is_blank(cell: &Cell) -> bool {
    cell.symbol() == " " && cell.bg == Color::Reset && cell.modifier.is_empty()
}

fn write_style(out: &mut impl Write, cell: &Cell) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    if let Some(fg) = term_color(cell.fg) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = term_color(cell.bg) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    let attributes = [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ];
    for (modifier, attribute) in attributes {
        if cell.modifier.contains(modifier) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

fn term_color(color: Color) -> Option<TermColor> {
    let mapped = match color {
        Color::Reset => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    };
    Some(mapped)
}
