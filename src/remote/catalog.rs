//! # Catalog Client
//!
//! High-level reads over the theme organization: the full repository
//! catalog, single repositories, contributors, docs, file trees, code
//! samples and file downloads. Everything goes through one [`FetchContext`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::cache::CacheStore;
use crate::core::config::ResolvedConfig;
use crate::remote::context::FetchContext;
use crate::remote::error::FetchError;
use crate::remote::github::GithubTransport;
use crate::remote::paginate::{CountSource, PaginatedFetcher};
use crate::remote::transport::Transport;
use crate::remote::tree::{BuiltTree, TreeBuilder};
use crate::remote::types::{CodeSample, Contributor, ReadmePointer, RepositoryRecord, SortKey};

/// Extensions of the sample files in the template repository.
pub const SAMPLE_EXTENSIONS: &[&str] = &[
    "c", "c++", "clj", "cs", "css", "dart", "ex", "go", "html", "java", "js", "kt", "md", "php",
    "py", "rb", "rs", "scala", "sml", "swift", "ts",
];

/// URL layout of the API and raw content hosts for one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_url: String,
    raw_url: String,
    organization: String,
}

impl Endpoints {
    pub fn new(api_url: &str, raw_url: &str, organization: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            raw_url: raw_url.trim_end_matches('/').to_string(),
            organization: organization.to_string(),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn org(&self) -> String {
        format!("{}/orgs/{}", self.api_url, self.organization)
    }

    pub fn org_repos(&self) -> String {
        format!("{}/repos", self.org())
    }

    pub fn repo(&self, app: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.organization, app)
    }

    pub fn contents(&self, app: &str) -> String {
        format!("{}/contents", self.repo(app))
    }

    pub fn readme(&self, app: &str) -> String {
        format!("{}/readme", self.repo(app))
    }

    pub fn raw(&self, app: &str, path: &str) -> String {
        format!("{}/{}/{}/master/{}", self.raw_url, self.organization, app, path)
    }

    pub fn sample(&self, extension: &str) -> String {
        self.raw("template", &format!("sample/dracula.{extension}"))
    }
}

pub struct CatalogClient {
    ctx: FetchContext,
    endpoints: Endpoints,
    fetcher: PaginatedFetcher,
}

impl CatalogClient {
    pub fn new(ctx: FetchContext, endpoints: Endpoints, fetcher: PaginatedFetcher) -> Self {
        Self {
            ctx,
            endpoints,
            fetcher,
        }
    }

    /// Client over the real GitHub hosts with the configured cache.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, FetchError> {
        let transport: Arc<dyn Transport> = Arc::new(GithubTransport::new(config.timeout)?);
        let cache = match (&config.cache_path, config.cache_enabled) {
            (Some(path), true) => {
                CacheStore::open(path, config.ttl_rules.clone(), config.default_ttl)
            }
            _ => CacheStore::in_memory(config.ttl_rules.clone(), config.default_ttl),
        };
        info!(
            "Catalog client for {} via {} ({} cached entries)",
            config.organization,
            transport.name(),
            cache.len()
        );

        Ok(Self::new(
            FetchContext::new(cache, transport),
            Endpoints::new(&config.api_url, &config.raw_url, &config.organization),
            PaginatedFetcher::new(config.per_page, config.fallback_repo_count),
        ))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Persist the response cache. Failures are logged, not fatal.
    pub fn flush(&mut self) {
        if let Err(e) = self.ctx.flush() {
            warn!("Failed to write response cache: {}", e);
        }
    }

    /// Every repository of the organization, sorted by `sort`.
    pub async fn fetch_catalog(
        &mut self,
        sort: SortKey,
        progress: impl FnMut(usize, usize),
    ) -> Result<Vec<RepositoryRecord>, FetchError> {
        let org_url = self.endpoints.org();
        let count = CountSource {
            url: &org_url,
            field: "public_repos",
        };
        let mut records: Vec<RepositoryRecord> = self
            .fetcher
            .fetch_all(&mut self.ctx, &self.endpoints.org_repos(), count, progress)
            .await?;
        sort.sort(&mut records);
        Ok(records)
    }

    pub async fn fetch_repository(&mut self, app: &str) -> Result<RepositoryRecord, FetchError> {
        self.ctx.get_resource_as(&self.endpoints.repo(app)).await
    }

    /// Contributors by contribution count, fewest first, bots excluded.
    /// Ties keep the API's order.
    pub async fn fetch_contributors(&mut self, url: &str) -> Result<Vec<Contributor>, FetchError> {
        let mut contributors: Vec<Contributor> = self.ctx.get_resource_as(url).await?;
        contributors.retain(|c| !c.is_bot());
        contributors.sort_by_key(|c| c.contributions);
        Ok(contributors)
    }

    pub async fn fetch_install_guide(&mut self, app: &str) -> Option<String> {
        let url = self.endpoints.raw(app, "INSTALL.md");
        self.optional_text(&url).await
    }

    /// Readme located through the API's readme pointer, then read raw.
    pub async fn fetch_readme(&mut self, app: &str) -> Option<String> {
        let pointer: ReadmePointer = match self.ctx.get_resource_as(&self.endpoints.readme(app)).await {
            Ok(pointer) => pointer,
            Err(e) => {
                debug!("No readme for {}: {}", app, e);
                return None;
            }
        };
        let url = self.endpoints.raw(app, &pointer.path);
        self.optional_text(&url).await
    }

    async fn optional_text(&mut self, url: &str) -> Option<String> {
        match self.ctx.get_text(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Treating {} as absent: {}", url, e);
                None
            }
        }
    }

    pub async fn fetch_tree(&mut self, app: &str) -> Result<BuiltTree, FetchError> {
        let contents_url = self.endpoints.contents(app);
        TreeBuilder::new(&mut self.ctx, contents_url).build("", app).await
    }

    /// Load every sample whose syntax `detect(file_name, code)` recognizes.
    ///
    /// Samples that fail to download or can't be detected are skipped.
    /// `progress` is called after each attempt with `(done, total)`.
    pub async fn fetch_samples(
        &mut self,
        detect: impl Fn(&str, &str) -> Option<String>,
        mut progress: impl FnMut(usize, usize),
    ) -> Vec<CodeSample> {
        let mut samples = Vec::new();
        for (i, extension) in SAMPLE_EXTENSIONS.iter().enumerate() {
            let url = self.endpoints.sample(extension);
            let file_name = format!("dracula.{extension}");

            match self.ctx.get_text(&url).await {
                Ok(code) => match detect(&file_name, &code) {
                    Some(syntax_name) => samples.push(CodeSample {
                        extension: extension.to_string(),
                        file_name,
                        code,
                        syntax_name,
                    }),
                    None => debug!("No syntax for {}, skipping", file_name),
                },
                Err(e) => warn!("Skipping sample {}: {}", file_name, e),
            }
            progress(i + 1, SAMPLE_EXTENSIONS.len());
        }
        info!("Loaded {} of {} samples", samples.len(), SAMPLE_EXTENSIONS.len());
        samples
    }

    /// Download `paths` of `app` into `dest`, each saved under its file name.
    pub async fn download_files(
        &mut self,
        app: &str,
        paths: &[String],
        dest: &Path,
    ) -> Result<Vec<PathBuf>, FetchError> {
        tokio::fs::create_dir_all(dest).await?;

        let mut written = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = self.ctx.get_bytes(&self.endpoints.raw(app, path)).await?;
            let file_name = Path::new(path)
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| path.into());
            let target = dest.join(file_name);
            tokio::fs::write(&target, &bytes).await?;
            info!("Wrote {} ({} bytes)", target.display(), bytes.len());
            written.push(target);
        }
        Ok(written)
    }
}
