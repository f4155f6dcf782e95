//! # Commands
//!
//! One async function per subcommand. Each fetches through the
//! `CatalogClient`, then hands the result to the console printer or one of
//! the interactive browsers. The response cache is flushed by the caller
//! once the command returns, whatever the outcome.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use dialoguer::{Confirm, Input, MultiSelect};
use log::info;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

use crate::core::config::ResolvedConfig;
use crate::remote::types::{RepositoryRecord, SortKey};
use crate::remote::{CatalogClient, FetchError};
use crate::tui::components::catalog_grid::{self, CardGrid};
use crate::tui::components::{DetailCard, file_tree};
use crate::tui::{self, console, highlight, markdown, theme};

#[derive(Debug)]
pub enum CommandError {
    Fetch(FetchError),
    /// The app named on the command line could not be loaded.
    App { app: String, source: FetchError },
    Io(io::Error),
    Prompt(dialoguer::Error),
    NoSamples,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Fetch(e) => write!(f, "{e}"),
            CommandError::App { app, source } => match source.status() {
                Some(status) => write!(f, "could not get {app}: Error {status}: {}", source.message()),
                None => write!(f, "could not get {app}: {source}"),
            },
            CommandError::Io(e) => write!(f, "I/O error: {e}"),
            CommandError::Prompt(e) => write!(f, "prompt failed: {e}"),
            CommandError::NoSamples => write!(f, "no code samples could be loaded"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Fetch(e) | CommandError::App { source: e, .. } => Some(e),
            CommandError::Io(e) => Some(e),
            CommandError::Prompt(e) => Some(e),
            CommandError::NoSamples => None,
        }
    }
}

impl From<FetchError> for CommandError {
    fn from(e: FetchError) -> Self {
        CommandError::Fetch(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

impl From<dialoguer::Error> for CommandError {
    fn from(e: dialoguer::Error) -> Self {
        CommandError::Prompt(e)
    }
}

/// Where `all` sends the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOutput {
    /// Rule and card grid printed to stdout.
    #[default]
    Print,
    /// Same output piped through `$PAGER`.
    Pager,
    /// Interactive browser with search.
    Browser,
}

/// Records that are app themes, in their original order.
pub fn visible_apps(records: Vec<RepositoryRecord>, hidden: &[String]) -> Vec<RepositoryRecord> {
    let hidden: HashSet<&str> = hidden.iter().map(String::as_str).collect();
    records
        .into_iter()
        .filter(|r| !hidden.contains(r.name.as_str()))
        .collect()
}

/// `all`: every app as a card grid, printed, paged or browsed interactively.
pub async fn all(
    client: &mut CatalogClient,
    config: &ResolvedConfig,
    sort: SortKey,
    output: CatalogOutput,
) -> Result<(), CommandError> {
    let records = client
        .fetch_catalog(sort, |done, total| console::progress("Fetching apps", done, total))
        .await;
    console::clear_progress();
    let records = records?;

    // The headline counts every repository; hidden ones just aren't drawn
    let count = records.len();
    let apps = visible_apps(records, &config.hidden_repos);
    info!("Catalog: {} repositories, {} apps shown", count, apps.len());

    let width = console::width();
    match output {
        CatalogOutput::Browser => Ok(tui::start_catalog_browser(apps)?),
        CatalogOutput::Print => {
            let mut out = io::stdout().lock();
            write_catalog(&mut out, &apps, count, width)?;
            Ok(out.flush()?)
        }
        CatalogOutput::Pager => {
            let mut out = Vec::new();
            write_catalog(&mut out, &apps, count, width)?;
            Ok(console::page(&out)?)
        }
    }
}

/// The "N Apps" rule followed by the card grid.
fn write_catalog(
    out: &mut impl Write,
    apps: &[RepositoryRecord],
    count: usize,
    width: u16,
) -> io::Result<()> {
    console::write_line(out, console::rule(&format!("{count} Apps"), width), width)?;
    let height = catalog_grid::grid_height(apps.len(), catalog_grid::columns(width));
    console::write_widget(out, CardGrid::new(apps, Utc::now()), Rect::new(0, 0, width, height))
}

/// `show`: detail card, then the installation guide and/or readme.
pub async fn show(
    client: &mut CatalogClient,
    app: &str,
    readme: bool,
    installation: bool,
) -> Result<(), CommandError> {
    let record = client
        .fetch_repository(app)
        .await
        .map_err(|source| CommandError::App {
            app: app.to_string(),
            source,
        })?;

    let contributors_url = record
        .contributors_url
        .clone()
        .unwrap_or_else(|| format!("{}/contributors", client.endpoints().repo(app)));
    let contributors = client.fetch_contributors(&contributors_url).await;

    let width = console::width();
    let card = DetailCard::new(&record, &contributors, Utc::now(), width.min(100));
    let area = console::centered(width, card.width(width.min(100)), card.height());
    console::print_widget(card, area)?;

    if installation {
        let guide = client.fetch_install_guide(app).await;
        console::print_panel(" Installation Guide ", theme::GREEN, document(guide, "installation guide"))?;
    }
    if readme {
        let text = client.fetch_readme(app).await;
        console::print_panel(" Readme ", theme::PINK, document(text, "readme"))?;
    }
    if !installation && !readme {
        let notice = Line::from(Span::styled(
            "You disabled both installation and readme.",
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        ))
        .centered();
        console::print_line(notice)?;
    }
    Ok(())
}

/// Rendered markdown, or a muted placeholder when the document is absent.
fn document(content: Option<String>, name: &str) -> Text<'static> {
    match content {
        Some(content) => markdown::render(&content),
        None => Text::from(Span::styled(
            format!("No {name} available."),
            Style::default().fg(theme::COMMENT),
        )),
    }
}

/// `demo`: browse the template's code samples.
pub async fn demo(client: &mut CatalogClient) -> Result<(), CommandError> {
    let samples = client
        .fetch_samples(highlight::detect_name, |done, total| {
            console::progress("Loading code demos", done, total)
        })
        .await;
    console::clear_progress();

    if samples.is_empty() {
        return Err(CommandError::NoSamples);
    }
    Ok(tui::start_sample_browser(samples)?)
}

/// `download`: show the tree, pick files and a destination, then write them.
pub async fn download(client: &mut CatalogClient, app: &str) -> Result<(), CommandError> {
    let tree = client.fetch_tree(app).await?;

    let width = console::width();
    let text = file_tree::tree_text(&tree.root);
    let height = u16::try_from(text.lines.len()).unwrap_or(u16::MAX);
    console::print_widget(Paragraph::new(text), Rect::new(0, 0, width, height))?;

    if tree.files.is_empty() {
        println!("{app} has no files to download.");
        return Ok(());
    }

    let picked = MultiSelect::new()
        .with_prompt("Which file(s) do you want to download?")
        .items(&tree.files)
        .interact()?;
    if picked.is_empty() {
        return Ok(());
    }
    let paths: Vec<String> = picked.into_iter().map(|i| tree.files[i].clone()).collect();

    let dest: String = Input::new()
        .with_prompt("Where to download the file to?")
        .default(".".to_string())
        .interact_text()?;

    let confirmed = Confirm::new()
        .with_prompt(format!("Are you sure you want to download {paths:?} to {dest}?"))
        .default(true)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    let written = client.download_files(app, &paths, Path::new(&dest)).await?;
    for path in &written {
        println!("Downloaded {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_hidden_repos_filtered_in_order() {
        let records = vec![record("vim", 3), record("template", 9), record("emacs", 1)];
        let apps = visible_apps(records, &["template".to_string()]);
        let names: Vec<&str> = apps.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["vim", "emacs"]);
    }

    #[test]
    fn test_app_error_message() {
        let err = CommandError::App {
            app: "nope".to_string(),
            source: FetchError::NotFound {
                url: "http://api/repos/dracula/nope".to_string(),
            },
        };
        assert_eq!(err.to_string(), "could not get nope: Error 404: Not Found");
    }

    #[test]
    fn test_catalog_output_counts_hidden_but_draws_apps() {
        let apps = vec![record("vim", 3), record("emacs", 1)];
        let mut out = Vec::new();
        write_catalog(&mut out, &apps, 3, 100).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" 3 Apps "));
        assert!(text.contains("vim"));
        assert!(text.contains("emacs"));
    }

    #[test]
    fn test_missing_document_placeholder() {
        let text = document(None, "readme");
        assert_eq!(text.lines[0].spans[0].content, "No readme available.");
    }
}
