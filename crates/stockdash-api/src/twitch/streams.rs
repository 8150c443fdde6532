// Helix stream lookup
//
// `GET streams?user_login=<channel>` with `Client-ID` and a bearer token.
// A 401 invalidates the cached token and the request is replayed exactly
// once; every other failure is returned as-is.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use super::HelixConfig;
use super::token::TokenManager;
use super::types::{StreamRecord, StreamsResponse};
use crate::error::Error;
use crate::sleep::SleepStatus;
use crate::transport::TransportConfig;

/// Queries Helix for a channel's current stream.
#[derive(Debug)]
pub struct StreamLookup {
    http: reqwest::Client,
    streams_url: Url,
    client_id: String,
    tokens: TokenManager,
}

impl StreamLookup {
    pub fn new(config: &HelixConfig, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, config)
    }

    /// Build a lookup that shares `http` with its token manager.
    pub fn with_client(http: reqwest::Client, config: &HelixConfig) -> Result<Self, Error> {
        let streams_url = config.api_base.join("streams")?;
        Ok(Self {
            tokens: TokenManager::new(http.clone(), config),
            http,
            streams_url,
            client_id: config.client_id.clone(),
        })
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// First entry of the channel's stream list, or `None` when offline.
    pub async fn current_stream(&self, channel: &str) -> Result<Option<StreamRecord>, Error> {
        let token = self.tokens.access_token().await?;
        let mut resp = self.send(channel, &token).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!("Helix rejected the cached token, re-issuing once");
            self.tokens.invalidate().await;
            let token = self.tokens.access_token().await?;
            resp = self.send(channel, &token).await?;

            if resp.status() == StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication {
                    message: "Streams HTTP 401 after token refresh".into(),
                });
            }
        }

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                context: "Streams",
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: StreamsResponse =
            serde_json::from_str(&body).map_err(|e| Error::from_body(&e, &body))?;
        Ok(envelope.data.into_iter().next())
    }

    /// Look up `channel` and classify it against `sleep_game`.
    pub async fn sleep_status(&self, channel: &str, sleep_game: &str) -> Result<SleepStatus, Error> {
        let stream = self.current_stream(channel).await?;
        Ok(SleepStatus::from_stream(stream.as_ref(), sleep_game))
    }

    async fn send(
        &self,
        channel: &str,
        token: &SecretString,
    ) -> Result<reqwest::Response, Error> {
        let mut url = self.streams_url.clone();
        url.query_pairs_mut().append_pair("user_login", channel);
        debug!("GET {}", url);

        self.http
            .get(url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)
    }
}

impl SleepStatus {
    /// Classify a stream: live iff `type == "live"`, sleeping iff live and
    /// the category matches `sleep_game` exactly.
    pub fn from_stream(stream: Option<&StreamRecord>, sleep_game: &str) -> Self {
        let Some(stream) = stream else {
            return Self::default();
        };
        let live = stream.is_live();
        Self {
            is_sleeping: live && stream.game_name == sleep_game,
            live,
            game_name: stream.game_name.clone(),
            title: stream.title.clone(),
        }
    }
}
