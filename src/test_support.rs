//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::cache::CacheStore;
use crate::remote::context::{FetchContext, cache_key};
use crate::remote::error::FetchError;
use crate::remote::transport::{RawResponse, Transport};
use crate::remote::types::{CodeSample, RepositoryRecord};

/// In-process transport serving canned responses keyed by URL + query.
/// Unrouted URLs answer 404. Every request is recorded.
pub struct FakeTransport {
    routes: Mutex<HashMap<String, RawResponse>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn route(&self, key: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.routes.lock().unwrap().insert(
            key.to_string(),
            RawResponse {
                status,
                body: body.into(),
                rate_limit_remaining: None,
            },
        );
    }

    pub fn route_json(&self, key: &str, value: serde_json::Value) {
        self.route(key, 200, value.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == key).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn name(&self) -> &str {
        "fake"
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, FetchError> {
        let key = cache_key(url, query);
        self.calls.lock().unwrap().push(key.clone());
        let response = self.routes.lock().unwrap().get(&key).cloned();
        Ok(response.unwrap_or(RawResponse {
            status: 404,
            body: br#"{"message":"Not Found"}"#.to_vec(),
            rate_limit_remaining: None,
        }))
    }
}

/// Context over `transport` with an in-memory, one-hour cache.
pub fn fake_context(transport: Arc<FakeTransport>) -> FetchContext {
    FetchContext::new(
        CacheStore::in_memory(vec![], Duration::from_secs(3600)),
        transport,
    )
}

pub fn record(name: &str, stars: u64) -> RepositoryRecord {
    RepositoryRecord {
        name: name.to_string(),
        description: None,
        size: 0,
        stars,
        forks: 0,
        watchers: 0,
        language: None,
        license: None,
        open_issues: 0,
        created_at: None,
        updated_at: None,
        pushed_at: None,
        contributors_url: None,
    }
}

pub fn sample(extension: &str) -> CodeSample {
    CodeSample {
        extension: extension.to_string(),
        file_name: format!("dracula.{extension}"),
        code: format!("// sample for {extension}\n"),
        syntax_name: extension.to_uppercase(),
    }
}
