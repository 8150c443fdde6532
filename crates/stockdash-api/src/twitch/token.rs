// Twitch app-access token cache
//
// Client-credentials grant against the identity endpoint. One token is
// cached at a time; the mutex stays locked across issuance so concurrent
// misses share a single POST.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::HelixConfig;
use super::types::TokenResponse;
use crate::error::Error;

/// A token is treated as expired this many seconds before Twitch says so.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Lifetime assumed when the grant response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// An issued bearer token and the instant Twitch will stop honoring it.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Build a token issued at `now` that lives for `expires_in` seconds.
    /// A missing or zero lifetime falls back to one hour.
    pub fn issued_at(now: DateTime<Utc>, value: SecretString, expires_in: Option<u64>) -> Self {
        let secs = expires_in
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let lifetime = i64::try_from(secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let expires_at = now
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { value, expires_at }
    }

    /// `true` while `now` is more than the safety margin before expiry.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now.checked_add_signed(TimeDelta::seconds(EXPIRY_MARGIN_SECS))
            .is_some_and(|edge| edge < self.expires_at)
    }
}

/// Owns the single cached [`AccessToken`].
pub struct TokenManager {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    client_secret: SecretString,
    cached: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(http: reqwest::Client, config: &HelixConfig) -> Self {
        Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Return the cached token if it is still fresh, otherwise issue a new
    /// one and cache it.
    pub async fn access_token(&self) -> Result<SecretString, Error> {
        let mut slot = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh_at(now)) {
            return Ok(token.value.clone());
        }

        let token = self.issue(now).await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call re-issues.
    pub async fn invalidate(&self) {
        debug!("invalidating cached app-access token");
        *self.cached.lock().await = None;
    }

    async fn issue(&self, now: DateTime<Utc>) -> Result<AccessToken, Error> {
        debug!("requesting app-access token from {}", self.token_url);

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("Token HTTP {}", status.as_u16()),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let grant: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!("unreadable token response: {e}"),
            })?;

        debug!(expires_in = ?grant.expires_in, "app-access token issued");
        Ok(AccessToken::issued_at(
            now,
            SecretString::from(grant.access_token),
            grant.expires_in,
        ))
    }
}
