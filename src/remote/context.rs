//! # Fetch Context
//!
//! Every remote read goes through a [`FetchContext`], which bundles the
//! response cache with the transport:
//!
//! ```text
//! get_*(url) ──► cache fresh? ──yes──► cached payload
//!                    │no (absent or stale)
//!                    ▼
//!              transport.get() ──non-2xx──► FetchError (nothing stored)
//!                    │2xx
//!                    ▼
//!              decode → cache.put() → payload
//! ```

use std::io;
use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;

use crate::core::cache::{CacheStore, Payload};
use crate::remote::error::FetchError;
use crate::remote::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadKind {
    Json,
    Text,
    Bytes,
}

pub struct FetchContext {
    cache: CacheStore,
    transport: Arc<dyn Transport>,
}

impl FetchContext {
    pub fn new(cache: CacheStore, transport: Arc<dyn Transport>) -> Self {
        Self { cache, transport }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.cache.flush()
    }

    /// Single JSON resource (metadata, contents listing).
    pub async fn get_resource(&mut self, url: &str) -> Result<serde_json::Value, FetchError> {
        match self.fetch(url, &[], PayloadKind::Json).await? {
            Payload::Json(value) => Ok(value),
            other => parse_json(url, &other.into_bytes()),
        }
    }

    /// [`get_resource`](Self::get_resource) decoded into `T`.
    pub async fn get_resource_as<T: DeserializeOwned>(&mut self, url: &str) -> Result<T, FetchError> {
        let value = self.get_resource(url).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Parse(format!("{url}: {e}")))
    }

    pub async fn get_text(&mut self, url: &str) -> Result<String, FetchError> {
        match self.fetch(url, &[], PayloadKind::Text).await? {
            Payload::Text(text) => Ok(text),
            other => Ok(String::from_utf8_lossy(&other.into_bytes()).into_owned()),
        }
    }

    pub async fn get_bytes(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.fetch(url, &[], PayloadKind::Bytes).await?.into_bytes())
    }

    /// One page of a collection endpoint (1-based `page`).
    pub async fn list_collection<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<T>, FetchError> {
        let query = [("per_page", page_size.to_string()), ("page", page.to_string())];
        let value = match self.fetch(endpoint, &query, PayloadKind::Json).await? {
            Payload::Json(value) => value,
            other => parse_json(endpoint, &other.into_bytes())?,
        };
        serde_json::from_value(value)
            .map_err(|e| FetchError::Parse(format!("{endpoint} page {page}: {e}")))
    }

    async fn fetch(
        &mut self,
        url: &str,
        query: &[(&str, String)],
        kind: PayloadKind,
    ) -> Result<Payload, FetchError> {
        let key = cache_key(url, query);

        if let Some(lookup) = self.cache.get(&key) {
            if lookup.is_fresh {
                debug!("Cache hit: {}", key);
                return Ok(lookup.payload.clone());
            }
            debug!("Cache stale: {}", key);
        }

        let response = self.transport.get(url, query).await?;
        if !response.is_success() {
            return Err(FetchError::from_status(
                &key,
                response.status,
                &response.body,
                response.rate_limit_remaining,
            ));
        }

        let payload = match kind {
            PayloadKind::Json => Payload::Json(parse_json(&key, &response.body)?),
            PayloadKind::Text => {
                Payload::Text(String::from_utf8_lossy(&response.body).into_owned())
            }
            PayloadKind::Bytes => Payload::Bytes(response.body),
        };
        self.cache.put(&key, payload.clone());
        Ok(payload)
    }
}

fn parse_json(url: &str, body: &[u8]) -> Result<serde_json::Value, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Parse(format!("{url}: {e}")))
}

/// Cache key for a request: the URL with its query string appended in order.
pub fn cache_key(url: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let params: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{url}?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::TtlRule;
    use crate::test_support::{FakeTransport, fake_context};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_cache_key_appends_query_in_order() {
        let q = [("per_page", "100".to_string()), ("page", "2".to_string())];
        assert_eq!(cache_key("http://h/r", &q), "http://h/r?per_page=100&page=2");
        assert_eq!(cache_key("http://h/r", &[]), "http://h/r");
    }

    #[tokio::test]
    async fn test_cache_hit_avoids_second_request() {
        let transport = Arc::new(FakeTransport::new());
        transport.route_json("http://h/orgs/dracula", json!({"public_repos": 3}));
        let mut ctx = fake_context(Arc::clone(&transport));

        let first = ctx.get_resource("http://h/orgs/dracula").await.unwrap();
        let second = ctx.get_resource("http://h/orgs/dracula").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count("http://h/orgs/dracula"), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let transport = Arc::new(FakeTransport::new());
        transport.route("http://h/readme", 200, "new");
        let mut cache = CacheStore::in_memory(
            vec![TtlRule::new("http://h/", Duration::from_secs(60))],
            Duration::from_secs(3600),
        );
        let long_ago = chrono::Utc::now() - chrono::TimeDelta::hours(1);
        cache.put_at("http://h/readme", Payload::Text("old".into()), long_ago);
        let mut ctx = FetchContext::new(cache, transport.clone());

        assert_eq!(ctx.get_text("http://h/readme").await.unwrap(), "new");
        assert_eq!(transport.call_count("http://h/readme"), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let transport = Arc::new(FakeTransport::new());
        transport.route("http://h/flaky", 500, "{\"message\":\"boom\"}");
        let mut ctx = fake_context(Arc::clone(&transport));

        let err = ctx.get_resource("http://h/flaky").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { status: 500, .. }));
        assert!(ctx.cache().is_empty());

        ctx.get_resource("http://h/flaky").await.unwrap_err();
        assert_eq!(transport.call_count("http://h/flaky"), 2);
    }

    #[tokio::test]
    async fn test_unrouted_url_is_not_found() {
        let transport = Arc::new(FakeTransport::new());
        let mut ctx = fake_context(transport);
        let err = ctx.get_bytes("http://h/missing").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.route("http://h/bad", 200, "<html>");
        let mut ctx = fake_context(transport);
        assert!(matches!(
            ctx.get_resource("http://h/bad").await,
            Err(FetchError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_list_collection_sends_page_query() {
        let transport = Arc::new(FakeTransport::new());
        transport.route_json("http://h/items?per_page=2&page=3", json!([1, 2]));
        let mut ctx = fake_context(Arc::clone(&transport));

        let items: Vec<u32> = ctx.list_collection("http://h/items", 3, 2).await.unwrap();
        assert_eq!(items, vec![1, 2]);
    }
}
