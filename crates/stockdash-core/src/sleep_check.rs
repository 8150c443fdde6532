// ── Sleep-status check ──
//
// Answers "is the broadcaster asleep on stream" for the banner. The answer
// is cached for a short TTL; the cache lock is never held across the
// network call, so two racing checks can both go upstream.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use stockdash_api::{SleepProxyClient, TransportConfig};

use crate::error::CoreError;

/// Last successful answer and when it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepCacheEntry {
    pub captured_at: Instant,
    pub value: bool,
}

#[derive(Debug)]
pub struct SleepCheck {
    client: Option<SleepProxyClient>,
    ttl: Duration,
    cache: Mutex<Option<SleepCacheEntry>>,
}

impl SleepCheck {
    /// A check against `proxy_url`, or one that always answers `false`
    /// when no proxy is configured.
    pub fn new(
        proxy_url: Option<Url>,
        ttl: Duration,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let client = proxy_url
            .map(|url| SleepProxyClient::new(url, transport))
            .transpose()?;
        Ok(Self::with_client(client, ttl))
    }

    pub fn with_client(client: Option<SleepProxyClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Current sleep status, served from cache while it is younger than the
    /// TTL. Upstream failures are returned and leave the cache untouched.
    pub async fn check(&self) -> Result<bool, CoreError> {
        let Some(client) = &self.client else {
            return Ok(false);
        };

        let now = Instant::now();
        let cached = *self.cache.lock().await;
        if let Some(entry) = cached {
            if now.saturating_duration_since(entry.captured_at) < self.ttl {
                debug!(sleeping = entry.value, "sleep status served from cache");
                return Ok(entry.value);
            }
        }

        let status = client.fetch_status().await?;
        *self.cache.lock().await = Some(SleepCacheEntry {
            captured_at: now,
            value: status.is_sleeping,
        });
        Ok(status.is_sleeping)
    }

    /// Most recent cached entry, fresh or not.
    pub async fn cached(&self) -> Option<SleepCacheEntry> {
        *self.cache.lock().await
    }

    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }
}
