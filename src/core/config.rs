//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.dracula/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::cache::TtlRule;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DraculaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub organization: Option<String>,
    pub hidden_repos: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GithubConfig {
    pub api_url: Option<String>,
    pub raw_url: Option<String>,
    pub per_page: Option<usize>,
    pub fallback_repo_count: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    pub enabled: Option<bool>,
    pub path: Option<String>,
    pub default_ttl_secs: Option<u64>,
    /// Replaces the built-in rules when non-empty.
    #[serde(default)]
    pub rules: Vec<TtlRuleEntry>,
}

/// `prefix` may use `{api}`, `{raw}` and `{org}` placeholders.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TtlRuleEntry {
    pub prefix: String,
    pub ttl_secs: u64,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ORGANIZATION: &str = "dracula";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_PER_PAGE: usize = 100;
pub const DEFAULT_FALLBACK_REPO_COUNT: usize = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TTL_SECS: u64 = 60 * 60;

/// Repositories in the organization that are not themes for an app.
pub const DEFAULT_HIDDEN_REPOS: &[&str] = &[
    "dracula-theme",
    "atom-ui",
    "chrome-devtools",
    "draculatheme.com",
    "jetbrains-legacy",
    "liteide-archived",
    "template",
    "spec",
    "jupyterlab_dracula",
    "racket",
    "react-devtools",
    "putty",
    "slate",
];

const HOUR: u64 = 60 * 60;

/// Built-in expiry rules, most specific first.
const DEFAULT_TTL_RULES: &[(&str, u64)] = &[
    ("{api}/repo", 6 * HOUR),
    ("{api}/orgs", 3 * HOUR),
    ("{raw}/{org}/template/master/sample", 7_890_000),
    ("{raw}/{org}/", 24 * HOUR),
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub organization: String,
    pub api_url: String,
    pub raw_url: String,
    pub per_page: usize,
    pub fallback_repo_count: usize,
    pub timeout: Duration,
    pub cache_enabled: bool,
    pub cache_path: Option<PathBuf>,
    pub default_ttl: Duration,
    pub ttl_rules: Vec<TtlRule>,
    pub hidden_repos: Vec<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

fn dracula_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".dracula"))
}

/// Returns the path to `~/.dracula/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dracula_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.dracula/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DraculaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DraculaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DraculaConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<DraculaConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(DraculaConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DraculaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Dracula CLI Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# organization = "dracula"           # Or set DRACULA_ORG env var
# hidden_repos = ["template", "spec"]  # Repositories left out of the catalog

# [github]
# api_url = "https://api.github.com"               # Or DRACULA_API_URL
# raw_url = "https://raw.githubusercontent.com"    # Or DRACULA_RAW_URL
# per_page = 100
# fallback_repo_count = 300          # Used when the repository count is unavailable
# timeout_secs = 30

# [cache]
# enabled = true
# path = "~/.dracula/cache.json"     # Or DRACULA_CACHE_PATH
# default_ttl_secs = 3600

# [[cache.rules]]                    # First matching prefix wins
# prefix = "{api}/orgs"
# ttl_secs = 10800
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_org` is from the `--org` flag (None = not specified).
pub fn resolve(config: &DraculaConfig, cli_org: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_org, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &DraculaConfig,
    cli_org: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Organization: CLI → env → config → default
    let organization = cli_org
        .map(|s| s.to_string())
        .or_else(|| env("DRACULA_ORG"))
        .or_else(|| config.general.organization.clone())
        .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());

    let api_url = env("DRACULA_API_URL")
        .or_else(|| config.github.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = api_url.trim_end_matches('/').to_string();

    let raw_url = env("DRACULA_RAW_URL")
        .or_else(|| config.github.raw_url.clone())
        .unwrap_or_else(|| DEFAULT_RAW_URL.to_string());
    let raw_url = raw_url.trim_end_matches('/').to_string();

    let cache_path = env("DRACULA_CACHE_PATH")
        .or_else(|| config.cache.path.clone())
        .map(|p| expand_home(&p))
        .or_else(|| dracula_dir().map(|d| d.join("cache.json")));

    let ttl_rules = if config.cache.rules.is_empty() {
        DEFAULT_TTL_RULES
            .iter()
            .map(|(prefix, secs)| {
                TtlRule::new(
                    expand_prefix(prefix, &api_url, &raw_url, &organization),
                    Duration::from_secs(*secs),
                )
            })
            .collect()
    } else {
        config
            .cache
            .rules
            .iter()
            .map(|rule| {
                TtlRule::new(
                    expand_prefix(&rule.prefix, &api_url, &raw_url, &organization),
                    Duration::from_secs(rule.ttl_secs),
                )
            })
            .collect()
    };

    let hidden_repos = config.general.hidden_repos.clone().unwrap_or_else(|| {
        DEFAULT_HIDDEN_REPOS.iter().map(|s| s.to_string()).collect()
    });

    ResolvedConfig {
        per_page: config.github.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1),
        fallback_repo_count: config
            .github
            .fallback_repo_count
            .unwrap_or(DEFAULT_FALLBACK_REPO_COUNT),
        timeout: Duration::from_secs(config.github.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        cache_enabled: config.cache.enabled.unwrap_or(true),
        cache_path,
        default_ttl: Duration::from_secs(config.cache.default_ttl_secs.unwrap_or(DEFAULT_TTL_SECS)),
        ttl_rules,
        hidden_repos,
        organization,
        api_url,
        raw_url,
    }
}

fn expand_prefix(prefix: &str, api_url: &str, raw_url: &str, organization: &str) -> String {
    prefix
        .replace("{api}", api_url)
        .replace("{raw}", raw_url)
        .replace("{org}", organization)
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = DraculaConfig::default();
        assert!(config.cache.rules.is_empty());
        assert!(config.general.organization.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&DraculaConfig::default(), None, no_env);
        assert_eq!(resolved.organization, "dracula");
        assert_eq!(resolved.api_url, DEFAULT_API_URL);
        assert_eq!(resolved.per_page, 100);
        assert_eq!(resolved.fallback_repo_count, 300);
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert!(resolved.cache_enabled);
        assert_eq!(resolved.hidden_repos.len(), DEFAULT_HIDDEN_REPOS.len());
    }

    #[test]
    fn test_default_rules_expand_placeholders() {
        let resolved = resolve_with_env(&DraculaConfig::default(), None, no_env);
        let prefixes: Vec<&str> = resolved
            .ttl_rules
            .iter()
            .map(|r| r.key_prefix.as_str())
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "https://api.github.com/repo",
                "https://api.github.com/orgs",
                "https://raw.githubusercontent.com/dracula/template/master/sample",
                "https://raw.githubusercontent.com/dracula/",
            ]
        );
        assert_eq!(resolved.ttl_rules[1].ttl, Duration::from_secs(10800));
    }

    #[test]
    fn test_env_overrides_config_and_cli_overrides_env() {
        let config = DraculaConfig {
            general: GeneralConfig {
                organization: Some("from-file".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let vars: HashMap<&str, &str> = [
            ("DRACULA_ORG", "from-env"),
            ("DRACULA_API_URL", "http://127.0.0.1:9000/"),
        ]
        .into_iter()
        .collect();
        let env = |key: &str| vars.get(key).map(|v| v.to_string());

        let resolved = resolve_with_env(&config, None, env);
        assert_eq!(resolved.organization, "from-env");
        assert_eq!(resolved.api_url, "http://127.0.0.1:9000");

        let resolved = resolve_with_env(&config, Some("from-cli"), env);
        assert_eq!(resolved.organization, "from-cli");
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let toml_str = r#"
[general]
organization = "acme"

[github]
raw_url = "http://raw.local"

[cache]
default_ttl_secs = 60

[[cache.rules]]
prefix = "{raw}/{org}/"
ttl_secs = 5
"#;
        let config: DraculaConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.ttl_rules.len(), 1);
        assert_eq!(resolved.ttl_rules[0].key_prefix, "http://raw.local/acme/");
        assert_eq!(resolved.ttl_rules[0].ttl, Duration::from_secs(5));
        assert_eq!(resolved.default_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[github]
per_page = 50
"#;
        let config: DraculaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.per_page, Some(50));
        assert!(config.github.api_url.is_none());
        assert!(config.general.hidden_repos.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.general.organization.is_none());

        // The generated file is all comments, so it parses to defaults too
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.github.per_page.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[github\nper_page = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
