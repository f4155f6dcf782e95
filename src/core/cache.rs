//! # Response Cache
//!
//! Key/value store for remote responses with per-resource-class expiry.
//!
//! Keys are full request URLs (query string included). Each key resolves to a
//! TTL through an ordered list of [`TtlRule`]s: the first rule whose prefix
//! matches wins, otherwise the store's default TTL applies.
//!
//! ```text
//! get(key) ──► absent            → caller fetches live, then put()
//!          ──► Lookup{fresh}     → caller uses payload
//!          ──► Lookup{stale}     → caller fetches live, then put() supersedes
//! ```
//!
//! Stale entries are never evicted, only overwritten. The store can be flushed
//! to a JSON file (atomic `.tmp` + rename) and reopened on the next run.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// On-disk format version. Files with another version are ignored.
const CACHE_FILE_VERSION: u32 = 1;

/// A cached response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Raw bytes of the payload, regardless of how it was stored.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Json(value) => value.to_string().into_bytes(),
            Payload::Text(text) => text.into_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }
}

/// Which TTL an entry was stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryClass {
    Rule { prefix: String },
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Payload,
    pub stored_at: DateTime<Utc>,
    pub expiry_class: ExpiryClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlRule {
    pub key_prefix: String,
    pub ttl: Duration,
}

impl TtlRule {
    pub fn new(key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ttl,
        }
    }
}

/// Result of a cache lookup that found an entry.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    pub payload: &'a Payload,
    pub is_fresh: bool,
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: Vec<CacheEntry>,
}

pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    rules: Vec<TtlRule>,
    default_ttl: Duration,
    path: Option<PathBuf>,
    dirty: bool,
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("rules", &self.rules.len())
            .field("default_ttl", &self.default_ttl)
            .field("path", &self.path)
            .finish()
    }
}

impl CacheStore {
    /// A store that lives only as long as the process.
    pub fn in_memory(rules: Vec<TtlRule>, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            rules,
            default_ttl,
            path: None,
            dirty: false,
        }
    }

    /// Open a store backed by `path`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// logged and ignored; it is replaced on the next `flush()`.
    pub fn open(path: impl Into<PathBuf>, rules: Vec<TtlRule>, default_ttl: Duration) -> Self {
        let path = path.into();
        let mut store = Self::in_memory(rules, default_ttl);

        match load_entries(&path) {
            Ok(entries) => {
                info!("Loaded {} cache entries from {}", entries.len(), path.display());
                store.entries = entries
                    .into_iter()
                    .map(|entry| (entry.key.clone(), entry))
                    .collect();
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cache file at {}", path.display());
            }
            Err(e) => {
                warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
            }
        }

        store.path = Some(path);
        store
    }

    /// TTL for `key`: first matching rule, else the default.
    pub fn ttl(&self, key: &str) -> Duration {
        self.matching_rule(key)
            .map(|rule| rule.ttl)
            .unwrap_or(self.default_ttl)
    }

    pub fn expiry_class(&self, key: &str) -> ExpiryClass {
        match self.matching_rule(key) {
            Some(rule) => ExpiryClass::Rule {
                prefix: rule.key_prefix.clone(),
            },
            None => ExpiryClass::Default,
        }
    }

    fn matching_rule(&self, key: &str) -> Option<&TtlRule> {
        self.rules.iter().find(|rule| key.starts_with(&rule.key_prefix))
    }

    pub fn get(&self, key: &str) -> Option<Lookup<'_>> {
        self.get_at(key, Utc::now())
    }

    /// Look up `key` as of `now`. Fresh means `now - stored_at < ttl(key)`.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Lookup<'_>> {
        let entry = self.entries.get(key)?;
        let ttl = TimeDelta::from_std(self.ttl(key)).unwrap_or(TimeDelta::MAX);
        let age = now.signed_duration_since(entry.stored_at);
        Some(Lookup {
            payload: &entry.payload,
            is_fresh: age < ttl,
        })
    }

    pub fn put(&mut self, key: &str, payload: Payload) {
        self.put_at(key, payload, Utc::now());
    }

    /// Store `payload` under `key`, superseding any previous entry.
    pub fn put_at(&mut self, key: &str, payload: Payload, now: DateTime<Utc>) {
        let entry = CacheEntry {
            key: key.to_string(),
            payload,
            stored_at: now,
            expiry_class: self.expiry_class(key),
        };
        self.entries.insert(key.to_string(), entry);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all entries to the backing file if anything changed.
    /// No-op for in-memory stores.
    pub fn flush(&mut self) -> io::Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        let mut entries: Vec<CacheEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        let file = CacheFile {
            version: CACHE_FILE_VERSION,
            entries,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write_json(path, &file)?;
        debug!("Flushed {} cache entries to {}", self.entries.len(), path.display());
        self.dirty = false;
        Ok(())
    }
}

fn load_entries(path: &Path) -> io::Result<Vec<CacheEntry>> {
    let json = fs::read_to_string(path)?;
    let file: CacheFile =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if file.version != CACHE_FILE_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported cache version {}", file.version),
        ));
    }
    Ok(file.entries)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json =
        serde_json::to_string(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
