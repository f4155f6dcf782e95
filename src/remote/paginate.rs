//! # Paginated Aggregation
//!
//! Rebuilds a complete, ordered collection from a paged endpoint.
//!
//! ```text
//! count endpoint ──ok──► TotalCount { Exact }
//!                └─err─► TotalCount { Estimated (fallback) }
//!
//! pages = ceil(total / page_size)
//! page 1 → page 2 → … → page N      (sequential, in order)
//!        └─ any failure ─► AggregationAborted(cause), nothing returned
//! ```

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::remote::context::FetchContext;
use crate::remote::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Exact,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalCount {
    pub value: usize,
    pub confidence: Confidence,
}

/// Where to read the collection size from: a JSON resource and the numeric
/// field holding the count.
#[derive(Debug, Clone, Copy)]
pub struct CountSource<'a> {
    pub url: &'a str,
    pub field: &'a str,
}

pub struct PaginatedFetcher {
    page_size: usize,
    fallback_total: usize,
}

impl PaginatedFetcher {
    pub fn new(page_size: usize, fallback_total: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            fallback_total,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Total from `source`, or the fallback estimate if it can't be read.
    pub async fn total_count(&self, ctx: &mut FetchContext, source: CountSource<'_>) -> TotalCount {
        let exact = match ctx.get_resource(source.url).await {
            Ok(value) => value.get(source.field).and_then(|v| v.as_u64()),
            Err(e) => {
                warn!("Could not read total from {}: {}", source.url, e);
                None
            }
        };

        match exact {
            Some(value) => TotalCount {
                value: value as usize,
                confidence: Confidence::Exact,
            },
            None => {
                info!("Using estimated total of {}", self.fallback_total);
                TotalCount {
                    value: self.fallback_total,
                    confidence: Confidence::Estimated,
                }
            }
        }
    }

    /// Fetch every page of `endpoint` and concatenate them in order.
    ///
    /// `progress` is called after each page with `(items_so_far, total)`.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        ctx: &mut FetchContext,
        endpoint: &str,
        count: CountSource<'_>,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Vec<T>, FetchError> {
        let total = self.total_count(ctx, count).await;
        let pages = self.page_count(total.value);
        debug!(
            "Fetching {} pages of {} from {} ({:?} total {})",
            pages, self.page_size, endpoint, total.confidence, total.value
        );

        let mut items = Vec::new();
        for page in 1..=pages {
            let batch: Vec<T> = ctx
                .list_collection(endpoint, page, self.page_size)
                .await
                .map_err(|e| {
                    warn!("Page {} of {} failed: {}", page, endpoint, e);
                    FetchError::AggregationAborted(Box::new(e))
                })?;
            items.extend(batch);
            progress(items.len(), total.value);
        }

        info!("Aggregated {} items from {}", items.len(), endpoint);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeTransport, fake_context};
    use serde_json::json;
    use std::sync::Arc;

    const ENDPOINT: &str = "http://h/orgs/o/repos";
    const COUNT: CountSource<'static> = CountSource {
        url: "http://h/orgs/o",
        field: "public_repos",
    };

    /// Serve `total` numbered items in pages of `page_size`.
    fn paged_source(total: usize, page_size: usize) -> Arc<FakeTransport> {
        let transport = Arc::new(FakeTransport::new());
        transport.route_json(COUNT.url, json!({ "public_repos": total }));
        let items: Vec<usize> = (0..total).collect();
        for (i, chunk) in items.chunks(page_size).enumerate() {
            transport.route_json(
                &format!("{ENDPOINT}?per_page={page_size}&page={}", i + 1),
                json!(chunk),
            );
        }
        transport
    }

    #[test]
    fn test_page_count_rounds_up() {
        let fetcher = PaginatedFetcher::new(100, 300);
        assert_eq!(fetcher.page_count(0), 0);
        assert_eq!(fetcher.page_count(100), 1);
        assert_eq!(fetcher.page_count(101), 2);
        assert_eq!(fetcher.page_count(250), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_page_order() {
        let transport = paged_source(7, 3);
        let mut ctx = fake_context(Arc::clone(&transport));
        let fetcher = PaginatedFetcher::new(3, 300);

        let mut seen = Vec::new();
        let items: Vec<usize> = fetcher
            .fetch_all(&mut ctx, ENDPOINT, COUNT, |done, total| seen.push((done, total)))
            .await
            .unwrap();

        assert_eq!(items, (0..7).collect::<Vec<_>>());
        assert_eq!(seen, vec![(3, 7), (6, 7), (7, 7)]);
        assert_eq!(
            transport.calls(),
            vec![
                COUNT.url.to_string(),
                format!("{ENDPOINT}?per_page=3&page=1"),
                format!("{ENDPOINT}?per_page=3&page=2"),
                format!("{ENDPOINT}?per_page=3&page=3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_page_aborts_whole_fetch() {
        let transport = paged_source(9, 3);
        transport.route(&format!("{ENDPOINT}?per_page=3&page=2"), 502, "{\"message\":\"Bad Gateway\"}");
        let mut ctx = fake_context(Arc::clone(&transport));
        let fetcher = PaginatedFetcher::new(3, 300);

        let result: Result<Vec<usize>, _> = fetcher.fetch_all(&mut ctx, ENDPOINT, COUNT, |_, _| {}).await;

        match result {
            Err(FetchError::AggregationAborted(inner)) => {
                assert!(matches!(*inner, FetchError::Transport { status: 502, .. }));
            }
            other => panic!("expected AggregationAborted, got {other:?}"),
        }
        // Page 3 is never requested
        assert_eq!(transport.call_count(&format!("{ENDPOINT}?per_page=3&page=3")), 0);
    }

    #[tokio::test]
    async fn test_count_failure_falls_back_to_estimate() {
        let transport = Arc::new(FakeTransport::new());
        transport.route(COUNT.url, 403, "{\"message\":\"rate limit\"}");
        transport.route_json(&format!("{ENDPOINT}?per_page=2&page=1"), json!([1, 2]));
        transport.route_json(&format!("{ENDPOINT}?per_page=2&page=2"), json!([3]));
        let mut ctx = fake_context(Arc::clone(&transport));
        let fetcher = PaginatedFetcher::new(2, 4);

        let total = fetcher.total_count(&mut ctx, COUNT).await;
        assert_eq!(total.confidence, Confidence::Estimated);
        assert_eq!(total.value, 4);

        let items: Vec<u32> = fetcher.fetch_all(&mut ctx, ENDPOINT, COUNT, |_, _| {}).await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_missing_count_field_is_estimated() {
        let transport = Arc::new(FakeTransport::new());
        transport.route_json(COUNT.url, json!({"login": "o"}));
        let mut ctx = fake_context(transport);
        let total = PaginatedFetcher::new(100, 300).total_count(&mut ctx, COUNT).await;
        assert_eq!(total, TotalCount { value: 300, confidence: Confidence::Estimated });
    }

    #[tokio::test]
    async fn test_zero_total_requests_no_pages() {
        let transport = paged_source(0, 100);
        let mut ctx = fake_context(Arc::clone(&transport));
        let items: Vec<usize> = PaginatedFetcher::new(100, 300)
            .fetch_all(&mut ctx, ENDPOINT, COUNT, |_, _| {})
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_huge_count_does_not_preallocate() {
        let transport = Arc::new(FakeTransport::new());
        transport.route_json(COUNT.url, json!({"public_repos": u64::MAX}));
        let mut ctx = fake_context(Arc::clone(&transport));

        // Page 1 is unrouted, so the fetch stops there instead of allocating
        let result: Result<Vec<usize>, _> = PaginatedFetcher::new(100, 300)
            .fetch_all(&mut ctx, ENDPOINT, COUNT, |_, _| {})
            .await;

        assert!(matches!(result, Err(FetchError::AggregationAborted(_))));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let transport = Arc::new(FakeTransport::new());
        transport.route_json(COUNT.url, json!({"public_repos": 4}));
        transport.route_json(&format!("{ENDPOINT}?per_page=2&page=1"), json!(["a", "b"]));
        transport.route_json(&format!("{ENDPOINT}?per_page=2&page=2"), json!(["b", "c"]));
        let mut ctx = fake_context(transport);
        let items: Vec<String> = PaginatedFetcher::new(2, 300)
            .fetch_all(&mut ctx, ENDPOINT, COUNT, |_, _| {})
            .await
            .unwrap();
        assert_eq!(items, vec!["a", "b", "b", "c"]);
    }
}
