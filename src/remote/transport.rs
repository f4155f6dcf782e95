use async_trait::async_trait;

use crate::remote::error::FetchError;

/// An HTTP response as the fetch layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Value of the `x-ratelimit-remaining` header, if present.
    pub rate_limit_remaining: Option<u64>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin GET-only HTTP adapter. Only connection-level failures are errors;
/// every response, whatever its status, comes back as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, FetchError>;
}
