//! Schemas for the remote payloads.
//!
//! Unknown fields are ignored. `name` (and `path`/`type` for contents) are
//! required; everything else defaults when missing.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::view::Searchable;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct License {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Repository size in KiB.
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "stargazers_count")]
    pub stars: u64,
    #[serde(default, rename = "forks_count")]
    pub forks: u64,
    #[serde(default, rename = "watchers_count")]
    pub watchers: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default, rename = "open_issues_count")]
    pub open_issues: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contributors_url: Option<String>,
}

impl Searchable for RepositoryRecord {
    fn matches(&self, query: &str) -> bool {
        self.name.contains(query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One item of a contents listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub contributions: u64,
}

impl Contributor {
    pub fn is_bot(&self) -> bool {
        self.login == "ImgBotApp" || self.login.ends_with("[bot]")
    }
}

/// `GET /repos/{org}/{app}/readme` → where the readme lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmePointer {
    pub path: String,
}

/// A sample source file with a detected syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSample {
    pub extension: String,
    pub file_name: String,
    pub code: String,
    pub syntax_name: String,
}

/// Catalog sort order. `name` is ascending, everything else descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    Name,
    #[default]
    #[value(alias = "star")]
    Stars,
    #[value(alias = "fork")]
    Forks,
    Size,
    #[value(alias = "watcher")]
    Watchers,
    Language,
    #[value(alias = "issue")]
    Issues,
    #[value(name = "created_at")]
    CreatedAt,
    #[value(name = "updated_at")]
    UpdatedAt,
    #[value(name = "pushed_at")]
    PushedAt,
}

impl SortKey {
    /// Stable sort; ties keep their fetched order.
    pub fn sort(self, records: &mut [RepositoryRecord]) {
        match self {
            SortKey::Name => records.sort_by(|a, b| a.name.cmp(&b.name)),
            _ => records.sort_by(|a, b| self.compare(b, a)),
        }
    }

    fn compare(self, a: &RepositoryRecord, b: &RepositoryRecord) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Stars => a.stars.cmp(&b.stars),
            SortKey::Forks => a.forks.cmp(&b.forks),
            SortKey::Size => a.size.cmp(&b.size),
            SortKey::Watchers => a.watchers.cmp(&b.watchers),
            SortKey::Language => a.language.cmp(&b.language),
            SortKey::Issues => a.open_issues.cmp(&b.open_issues),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::PushedAt => a.pushed_at.cmp(&b.pushed_at),
        }
    }
}
