// ── Runtime dashboard configuration ──
//
// These types describe *what* the dashboard polls and how it shapes the
// data. They never touch disk: `stockdash-config` (or a test) builds a
// `DashboardConfig` and hands it to `Dashboard::new`.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use stockdash_api::{TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/VedalAI/neuro-stocks-data/main/portfolio.json";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_HISTORY_LIMIT: usize = 1200;
pub const DEFAULT_SAMPLE_TARGET: usize = 400;
pub const DEFAULT_SLEEP_CACHE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retention cap `R` and render target `T` for the equity series.
///
/// Both are non-zero and `T <= R`; violating either is rejected here so the
/// series functions never see a degenerate target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesLimits {
    retention: NonZeroUsize,
    target: NonZeroUsize,
}

impl SeriesLimits {
    pub fn new(retention: usize, target: usize) -> Result<Self, CoreError> {
        let retention = NonZeroUsize::new(retention)
            .ok_or_else(|| CoreError::config("history limit must be greater than zero"))?;
        let target = NonZeroUsize::new(target)
            .ok_or_else(|| CoreError::config("sample target must be greater than zero"))?;
        if target > retention {
            return Err(CoreError::config(format!(
                "sample target ({target}) exceeds history limit ({retention})"
            )));
        }
        Ok(Self { retention, target })
    }

    pub fn retention(&self) -> NonZeroUsize {
        self.retention
    }

    pub fn target(&self) -> NonZeroUsize {
        self.target
    }
}

impl Default for SeriesLimits {
    fn default() -> Self {
        Self {
            retention: NonZeroUsize::new(DEFAULT_HISTORY_LIMIT).unwrap_or(NonZeroUsize::MIN),
            target: NonZeroUsize::new(DEFAULT_SAMPLE_TARGET).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// TLS verification strategy for outbound requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled webpki roots.
    #[default]
    SystemDefaults,
    /// Additionally trust a PEM CA file (corporate proxies, mirrors).
    CustomCa(PathBuf),
}

/// Everything the refresh controller needs to run.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Portfolio JSON document.
    pub feed_url: Url,
    /// Sleep-status proxy. `None` disables the sleep check entirely.
    pub proxy_url: Option<Url>,
    /// Timer period. Zero disables the timer; manual refresh still works.
    pub refresh_interval: Duration,
    pub limits: SeriesLimits,
    /// Number of most recent activities kept for display.
    pub activity_limit: usize,
    /// How long a successful sleep check is reused.
    pub sleep_cache_ttl: Duration,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DashboardConfig {
    /// Defaults for everything except the feed location.
    pub fn new(feed_url: Url) -> Self {
        Self {
            feed_url,
            proxy_url: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            limits: SeriesLimits::default(),
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            sleep_cache_ttl: DEFAULT_SLEEP_CACHE_TTL,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the [`TransportConfig`] shared by the feed and proxy clients.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: self.timeout,
        }
    }
}
