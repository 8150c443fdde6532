//! Shared configuration for the stockdash dashboard and sleep proxy.
//!
//! One TOML file with a `[dashboard]` and a `[proxy]` table, overlaid with
//! `STOCKDASH_`-prefixed environment variables, plus Twitch credential
//! resolution (env → keyring → plaintext). Both binaries translate the
//! loaded [`Config`] into runtime types from `stockdash-core` /
//! `stockdash-api` through this crate.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use stockdash_api::{HelixConfig, TlsMode, TransportConfig};
use stockdash_api::twitch::{DEFAULT_API_BASE, DEFAULT_TOKEN_URL};
use stockdash_core::config::{
    DEFAULT_ACTIVITY_LIMIT, DEFAULT_FEED_URL, DEFAULT_HISTORY_LIMIT, DEFAULT_SAMPLE_TARGET,
};
use stockdash_core::{DashboardConfig, SeriesLimits, TlsVerification};

/// Keyring service name for stored Twitch credentials.
pub const KEYRING_SERVICE: &str = "stockdash";
pub const CLIENT_ID_ENV: &str = "TWITCH_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "TWITCH_CLIENT_SECRET";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no Twitch {credential} configured (set {env}, store it in the keyring, or add it to the [proxy] table)")]
    NoCredentials {
        credential: &'static str,
        env: &'static str,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSettings,

    #[serde(default)]
    pub proxy: ProxySettings,
}

/// `[dashboard]`: what the terminal dashboard polls and how it shapes data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardSettings {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Sleep-status proxy URL. Leave unset to disable the sleep banner.
    pub proxy_url: Option<String>,

    /// Seconds between automatic refreshes. 0 = manual only.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_sample_target")]
    pub sample_target: usize,

    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,

    /// Seconds a sleep-status answer is reused.
    #[serde(default = "default_sleep_cache_ttl")]
    pub sleep_cache_ttl: u64,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra PEM CA to trust.
    pub ca_cert: Option<PathBuf>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            proxy_url: None,
            refresh_interval: default_refresh_interval(),
            history_limit: default_history_limit(),
            sample_target: default_sample_target(),
            activity_limit: default_activity_limit(),
            sleep_cache_ttl: default_sleep_cache_ttl(),
            timeout: default_timeout(),
            ca_cert: None,
        }
    }
}

/// `[proxy]`: the sleep-status HTTP service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProxySettings {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Broadcaster login to watch.
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Category name that marks the broadcaster as asleep. Matched exactly.
    #[serde(default = "default_sleep_game")]
    pub sleep_game: String,

    /// Twitch client id (plaintext; env var or keyring take precedence).
    pub client_id: Option<String>,

    /// Twitch client secret (plaintext; prefer keyring or env var).
    pub client_secret: Option<String>,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    pub ca_cert: Option<PathBuf>,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            channel: default_channel(),
            sleep_game: default_sleep_game(),
            client_id: None,
            client_secret: None,
            token_url: default_token_url(),
            api_base: default_api_base(),
            timeout: default_timeout(),
            ca_cert: None,
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.into()
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
fn default_sample_target() -> usize {
    DEFAULT_SAMPLE_TARGET
}
fn default_activity_limit() -> usize {
    DEFAULT_ACTIVITY_LIMIT
}
fn default_sleep_cache_ttl() -> u64 {
    60
}
fn default_timeout() -> u64 {
    30
}
fn default_bind() -> String {
    "127.0.0.1:8787".into()
}
fn default_channel() -> String {
    "vedal987".into()
}
fn default_sleep_game() -> String {
    "I'm Only Sleeping".into()
}
fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.into()
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "stockdash", "stockdash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stockdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then `path` (if it exists), then `STOCKDASH_*` variables.
///
/// Nested keys use a double underscore:
/// `STOCKDASH_DASHBOARD__PROXY_URL=http://localhost:8787/`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOCKDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize `cfg` as TOML, creating parent directories.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// First non-empty value of env var → keyring → plaintext.
fn first_credential(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<String> {
    let non_empty = |v: &String| !v.trim().is_empty();
    env.filter(non_empty)
        .or_else(|| keyring().filter(non_empty))
        .or_else(|| plaintext.map(str::to_owned).filter(non_empty))
}

fn keyring_lookup(user: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, user)
        .ok()?
        .get_password()
        .ok()
}

pub const KEYRING_CLIENT_ID: &str = "twitch/client-id";
pub const KEYRING_CLIENT_SECRET: &str = "twitch/client-secret";

impl ProxySettings {
    /// `TWITCH_CLIENT_ID` → keyring → `client_id`.
    pub fn resolve_client_id(&self) -> Result<String, ConfigError> {
        first_credential(
            std::env::var(CLIENT_ID_ENV).ok(),
            || keyring_lookup(KEYRING_CLIENT_ID),
            self.client_id.as_deref(),
        )
        .ok_or(ConfigError::NoCredentials {
            credential: "client id",
            env: CLIENT_ID_ENV,
        })
    }

    /// `TWITCH_CLIENT_SECRET` → keyring → `client_secret`.
    pub fn resolve_client_secret(&self) -> Result<SecretString, ConfigError> {
        first_credential(
            std::env::var(CLIENT_SECRET_ENV).ok(),
            || keyring_lookup(KEYRING_CLIENT_SECRET),
            self.client_secret.as_deref(),
        )
        .map(SecretString::from)
        .ok_or(ConfigError::NoCredentials {
            credential: "client secret",
            env: CLIENT_SECRET_ENV,
        })
    }

    /// Credentials plus endpoints for the Twitch clients.
    pub fn to_helix_config(&self) -> Result<HelixConfig, ConfigError> {
        let token_url = parse_url("proxy.token_url", &self.token_url)?;
        let mut api_base = parse_url("proxy.api_base", &self.api_base)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(HelixConfig {
            client_id: self.resolve_client_id()?,
            client_secret: self.resolve_client_secret()?,
            token_url,
            api_base,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| invalid("proxy.bind", format!("{e}: {}", self.bind)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Client settings for the Twitch calls.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self
                .ca_cert
                .clone()
                .map_or(TlsMode::System, TlsMode::CustomCa),
            timeout: self.timeout(),
        }
    }
}

// ── Translation to runtime config ───────────────────────────────────

impl DashboardSettings {
    /// Build a [`DashboardConfig`], validating URLs and series limits.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let feed_url = parse_url("dashboard.feed_url", &self.feed_url)?;
        let proxy_url = self
            .proxy_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_url("dashboard.proxy_url", s))
            .transpose()?;
        let limits = SeriesLimits::new(self.history_limit, self.sample_target)
            .map_err(|e| invalid("dashboard.sample_target", e.to_string()))?;

        Ok(DashboardConfig {
            feed_url,
            proxy_url,
            refresh_interval: Duration::from_secs(self.refresh_interval),
            limits,
            activity_limit: self.activity_limit,
            sleep_cache_ttl: Duration::from_secs(self.sleep_cache_ttl),
            tls: tls_for(self.ca_cert.as_ref()),
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse()
        .map_err(|e| invalid(field, format!("{e}: {raw}")))
}

fn tls_for(ca_cert: Option<&PathBuf>) -> TlsVerification {
    ca_cert.map_or(TlsVerification::SystemDefaults, |p| {
        TlsVerification::CustomCa(p.clone())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn credential_chain_prefers_env_then_keyring_then_plaintext() {
        let from_env = first_credential(Some("env".into()), || Some("ring".into()), Some("file"));
        let from_ring = first_credential(None, || Some("ring".into()), Some("file"));
        let from_file = first_credential(Some("  ".into()), || None, Some("file"));
        assert_eq!(from_env.as_deref(), Some("env"));
        assert_eq!(from_ring.as_deref(), Some("ring"));
        assert_eq!(from_file.as_deref(), Some("file"));
        assert!(first_credential(None, || None, Some("")).is_none());
    }

    // Loading reads the process environment, so every test that loads runs
    // inside a `Jail` to serialize against the ones that set variables.

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());

            let dash = cfg.dashboard.to_dashboard_config().unwrap();
            assert_eq!(dash.feed_url.as_str(), DEFAULT_FEED_URL);
            assert!(dash.proxy_url.is_none());
            assert_eq!(dash.refresh_interval, Duration::from_secs(30));
            assert_eq!(dash.limits, SeriesLimits::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [dashboard]
                    proxy_url = "http://127.0.0.1:9000/"
                    refresh_interval = 5
                    sample_target = 100

                    [proxy]
                    channel = "someone_else"
                "#,
            )?;

            let cfg = load_config_from(&jail.directory().join("config.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.proxy.channel, "someone_else");
            assert_eq!(cfg.proxy.sleep_game, "I'm Only Sleeping");

            let dash = cfg.dashboard.to_dashboard_config().unwrap();
            assert_eq!(dash.proxy_url.unwrap().as_str(), "http://127.0.0.1:9000/");
            assert_eq!(dash.refresh_interval, Duration::from_secs(5));
            assert_eq!(dash.limits.target().get(), 100);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [dashboard]
                    refresh_interval = 5
                "#,
            )?;
            jail.set_env("STOCKDASH_DASHBOARD__REFRESH_INTERVAL", "12");
            jail.set_env("STOCKDASH_PROXY__BIND", "0.0.0.0:9999");

            let cfg = load_config_from(&jail.directory().join("config.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.dashboard.refresh_interval, 12);
            assert_eq!(cfg.proxy.bind_addr().unwrap().port(), 9999);
            Ok(())
        });
    }

    #[test]
    fn invalid_limits_are_rejected() {
        let settings = DashboardSettings {
            history_limit: 10,
            sample_target: 20,
            ..DashboardSettings::default()
        };
        let err = settings.to_dashboard_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }), "got: {err:?}");
    }

    #[test]
    fn blank_proxy_url_disables_sleep_check() {
        let settings = DashboardSettings {
            proxy_url: Some("   ".into()),
            ..DashboardSettings::default()
        };
        assert!(settings.to_dashboard_config().unwrap().proxy_url.is_none());
    }

    #[test]
    fn helix_config_uses_env_credentials() {
        Jail::expect_with(|jail| {
            jail.set_env(CLIENT_ID_ENV, "cid-from-env");
            jail.set_env(CLIENT_SECRET_ENV, "secret-from-env");

            let settings = ProxySettings {
                api_base: "http://127.0.0.1:1/helix".into(),
                client_id: Some("cid-from-file".into()),
                ..ProxySettings::default()
            };
            let helix = settings.to_helix_config().map_err(|e| e.to_string())?;
            assert_eq!(helix.client_id, "cid-from-env");
            assert_eq!(helix.client_secret.expose_secret(), "secret-from-env");
            assert_eq!(helix.api_base.as_str(), "http://127.0.0.1:1/helix/");
            Ok(())
        });
    }

    #[test]
    fn proxy_transport_carries_ca_and_timeout() {
        let settings = ProxySettings {
            ca_cert: Some(PathBuf::from("/etc/stockdash/ca.pem")),
            timeout: 7,
            ..ProxySettings::default()
        };
        let transport = settings.transport();
        assert_eq!(transport.timeout, Duration::from_secs(7));
        assert!(
            matches!(transport.tls, TlsMode::CustomCa(ref p) if p == Path::new("/etc/stockdash/ca.pem"))
        );
        assert!(matches!(
            ProxySettings::default().transport().tls,
            TlsMode::System
        ));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.dashboard.proxy_url = Some("http://localhost:8787/".into());

        save_config_to(&path, &cfg).unwrap();
        let written: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, cfg);
    }
}
