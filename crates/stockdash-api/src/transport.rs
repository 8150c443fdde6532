//! HTTP client construction shared by every upstream.
//!
//! The feed, proxy and Twitch clients all go through [`TransportConfig`] so
//! they agree on timeout, user agent and trusted roots.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::{Certificate, Client, ClientBuilder};

use crate::error::Error;

const USER_AGENT: &str = concat!("stockdash/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which roots a client trusts.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Bundled webpki roots only.
    #[default]
    System,
    /// Bundled roots plus one extra PEM-encoded CA.
    CustomCa(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn load_ca(path: &Path) -> Result<Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA bundle {}: {e}", path.display())))?;
    Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}

impl TransportConfig {
    fn builder(&self) -> Result<ClientBuilder, Error> {
        let builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout);
        Ok(match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
        })
    }

    fn finish(builder: ClientBuilder) -> Result<Client, Error> {
        builder
            .build()
            .map_err(|e| Error::Tls(format!("HTTP client setup failed: {e}")))
    }

    /// Plain client, used for the Twitch endpoints.
    pub fn build_client(&self) -> Result<Client, Error> {
        Self::finish(self.builder()?)
    }

    /// Client whose every request carries `Cache-Control: no-cache` and
    /// `Pragma: no-cache`. The feed and proxy polls must always reach the
    /// origin.
    pub fn build_uncached_client(&self) -> Result<Client, Error> {
        let no_cache = HeaderValue::from_static("no-cache");
        let headers: HeaderMap = [(CACHE_CONTROL, no_cache.clone()), (PRAGMA, no_cache)]
            .into_iter()
            .collect();
        Self::finish(self.builder()?.default_headers(headers))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_bundle_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/stockdash-ca.pem")),
            ..TransportConfig::default()
        };
        let err = config.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(ref msg) if msg.contains("stockdash-ca.pem")));
    }

    #[test]
    fn default_config_builds_both_clients() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        config.build_client().unwrap();
        config.build_uncached_client().unwrap();
    }
}
