//! Syntax detection and highlighting on top of syntect's bundled defaults.

use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::tui::theme;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Closest bundled theme to Dracula's purple-on-charcoal look.
const THEME_NAME: &str = "base16-eighties.dark";

/// Extensions syntect knows under another token.
const EXTENSION_ALIASES: &[(&str, &str)] = &[("c++", "cpp"), ("h++", "hpp")];

fn highlight_theme() -> Option<&'static Theme> {
    THEME_SET
        .themes
        .get(THEME_NAME)
        .or_else(|| THEME_SET.themes.values().next())
}

/// Find a syntax for `file_name`, by extension first and then by the
/// code's first line (shebangs, modelines). Plain text does not count.
pub fn detect(file_name: &str, code: &str) -> Option<&'static SyntaxReference> {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or(file_name);
    let by_extension = SYNTAX_SET.find_syntax_by_extension(extension).or_else(|| {
        EXTENSION_ALIASES
            .iter()
            .find(|(alias, _)| *alias == extension)
            .and_then(|(_, ext)| SYNTAX_SET.find_syntax_by_extension(ext))
    });

    by_extension
        .or_else(|| SYNTAX_SET.find_syntax_by_first_line(code))
        .filter(|syntax| syntax.name != "Plain Text")
}

/// Name of the detected syntax, as stored on a code sample.
pub fn detect_name(file_name: &str, code: &str) -> Option<String> {
    detect(file_name, code).map(|syntax| syntax.name.clone())
}

/// Syntax for a fenced code block's info string (`rust`, `sh`, `json`).
pub fn for_token(token: &str) -> Option<&'static SyntaxReference> {
    if token.is_empty() {
        return None;
    }
    SYNTAX_SET.find_syntax_by_token(token)
}

/// Syntax by its display name, as recorded at detection time.
pub fn by_name(name: &str) -> Option<&'static SyntaxReference> {
    SYNTAX_SET.find_syntax_by_name(name)
}

/// Stateful line-by-line highlighter for one block of code.
pub struct Highlighter {
    inner: Option<HighlightLines<'static>>,
}

impl Highlighter {
    pub fn new(syntax: Option<&'static SyntaxReference>) -> Self {
        let inner = syntax
            .zip(highlight_theme())
            .map(|(syntax, theme)| HighlightLines::new(syntax, theme));
        Self { inner }
    }

    /// Highlight one line (with or without its trailing newline).
    /// Falls back to plain foreground text when highlighting is unavailable.
    pub fn line(&mut self, line: &str) -> Line<'static> {
        let plain = || {
            Line::from(Span::styled(
                expand_tabs(line.trim_end_matches(['\n', '\r'])),
                Style::default().fg(theme::FOREGROUND),
            ))
        };
        let Some(inner) = self.inner.as_mut() else {
            return plain();
        };
        match inner.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .filter_map(|(style, fragment)| {
                        let content = expand_tabs(fragment.trim_end_matches(['\n', '\r']));
                        if content.is_empty() {
                            return None;
                        }
                        let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                        Some(Span::styled(content, Style::default().fg(fg)))
                    })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                log::debug!("Highlighting failed, falling back to plain text: {}", e);
                plain()
            }
        }
    }
}

/// Highlight a whole file, one `Line` per source line.
pub fn highlight(code: &str, syntax: Option<&'static SyntaxReference>) -> Vec<Line<'static>> {
    let mut highlighter = Highlighter::new(syntax);
    LinesWithEndings::from(code)
        .map(|line| highlighter.line(line))
        .collect()
}

/// Tabs render as zero-width in ratatui.
fn expand_tabs(s: &str) -> String {
    s.replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_by_extension() {
        assert_eq!(detect_name("dracula.rs", "fn main() {}").as_deref(), Some("Rust"));
        assert_eq!(detect_name("dracula.py", "print(1)").as_deref(), Some("Python"));
        assert_eq!(detect_name("dracula.go", "package main").as_deref(), Some("Go"));
    }

    #[test]
    fn test_detects_cpp_alias() {
        assert_eq!(detect_name("dracula.c++", "int main() {}").as_deref(), Some("C++"));
    }

    #[test]
    fn test_falls_back_to_first_line() {
        assert_eq!(
            detect_name("dracula.unknownext", "#!/bin/bash\necho hi\n").as_deref(),
            Some("Bourne Again Shell (bash)")
        );
    }

    #[test]
    fn test_unknown_is_none() {
        assert!(detect_name("dracula.zzz", "just words").is_none());
    }

    #[test]
    fn test_highlight_keeps_line_count() {
        let code = "fn main() {\n\tprintln!(\"hi\");\n}\n";
        let lines = highlight(code, detect("x.rs", code));
        assert_eq!(lines.len(), 3);
        let second: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(second.starts_with("    println!"));
    }

    #[test]
    fn test_plain_fallback_without_syntax() {
        let lines = highlight("a\nb", None);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].style.fg, Some(theme::FOREGROUND));
    }
}
