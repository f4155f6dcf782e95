use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::remote::error::FetchError;
use crate::remote::transport::{RawResponse, Transport};

const USER_AGENT: &str = concat!("dracula-cli/", env!("CARGO_PKG_VERSION"));

/// `reqwest`-backed transport for the GitHub REST API and raw content host.
pub struct GithubTransport {
    client: reqwest::Client,
}

impl GithubTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                status: 0,
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for GithubTransport {
    fn name(&self) -> &str {
        "github"
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, FetchError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                FetchError::Transport {
                    status: 0,
                    message: e.to_string(),
                }
            })?;

        let status = response.status().as_u16();
        let rate_limit_remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            status,
            message: format!("failed to read response body: {e}"),
        })?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(RawResponse {
            status,
            body: body.to_vec(),
            rate_limit_remaining,
        })
    }
}
