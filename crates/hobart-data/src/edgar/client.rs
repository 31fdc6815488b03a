//! Rate-limited HTTP client for SEC EDGAR.

use crate::error::{DataError, Result};
use crate::limiter::{SEC_CALL_LIMIT, SharedTokenBucket, TokenBucket};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// User agent for SEC EDGAR requests (SEC requires identifying information)
const USER_AGENT: &str = "Hobart-TextFactors/0.1 (contact@example.com)";

/// Request timeout for EDGAR endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration: identification, rate budget, memo cache bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgarConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// Token bucket capacity
    pub rate_capacity: u32,
    /// Milliseconds per refilled permit
    pub refill_millis: u64,
    /// Memo cache bound (`None` = unbounded)
    pub cache_bound: Option<usize>,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            rate_capacity: SEC_CALL_LIMIT / 2,
            refill_millis: 1000 / u64::from(SEC_CALL_LIMIT / 2),
            cache_bound: None,
        }
    }
}

impl EdgarConfig {
    /// Build the token bucket this configuration describes.
    #[must_use]
    pub fn bucket(&self) -> TokenBucket {
        TokenBucket::new(self.rate_capacity, Duration::from_millis(self.refill_millis))
    }
}

/// HTTP client for EDGAR endpoints sharing one token bucket.
pub struct EdgarClient {
    client: reqwest::Client,
    limiter: SharedTokenBucket,
}

impl EdgarClient {
    /// Create a client with the default SEC budget.
    ///
    /// # Errors
    /// Returns `DataError::Network` if the underlying client cannot be
    /// built.
    pub fn new() -> Result<Self> {
        Self::from_config(&EdgarConfig::default())
    }

    /// Create a client from an explicit configuration.
    pub fn from_config(config: &EdgarConfig) -> Result<Self> {
        Self::build(&config.user_agent, config.bucket().shared())
    }

    /// Create a client sharing an existing token bucket.
    ///
    /// # Example
    /// ```no_run
    /// use hobart_data::edgar::EdgarClient;
    /// use hobart_data::limiter::TokenBucket;
    /// use std::time::Duration;
    ///
    /// # fn example() -> hobart_data::Result<()> {
    /// // 5 requests per second, shared with other clients
    /// let bucket = TokenBucket::new(5, Duration::from_millis(200)).shared();
    /// let client = EdgarClient::with_limiter(bucket)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_limiter(limiter: SharedTokenBucket) -> Result<Self> {
        Self::build(USER_AGENT, limiter)
    }

    fn build(user_agent: &str, limiter: SharedTokenBucket) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self { client, limiter })
    }

    /// Fetch a URL body as text under the shared rate limit.
    ///
    /// # Errors
    /// Returns `DataError::Http` for non-success status codes and
    /// `DataError::Network` for transport failures.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.limiter.lock().await.acquire().await;

        debug!(url, "EDGAR request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(DataError::Network)
    }

    /// Handle to the shared limiter, for co-limited clients.
    #[must_use]
    pub fn limiter(&self) -> SharedTokenBucket {
        self.limiter.clone()
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient").finish_non_exhaustive()
    }
}
