// Shared proxy state
//
// One `StreamLookup` (and therefore one token cache) per process, shared by
// every request through an `Arc`.

use std::sync::Arc;

use stockdash_api::StreamLookup;
use stockdash_config::ProxySettings;

use crate::error::ProxyError;

#[derive(Clone)]
pub struct ProxyState {
    inner: Arc<Inner>,
}

struct Inner {
    lookup: StreamLookup,
    channel: String,
    sleep_game: String,
}

impl ProxyState {
    pub fn new(lookup: StreamLookup, channel: String, sleep_game: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                lookup,
                channel,
                sleep_game,
            }),
        }
    }

    /// Resolve credentials and build the Twitch clients from settings.
    pub fn from_settings(settings: &ProxySettings) -> Result<Self, ProxyError> {
        let helix = settings.to_helix_config()?;
        let lookup = StreamLookup::new(&helix, &settings.transport())?;
        Ok(Self::new(
            lookup,
            settings.channel.clone(),
            settings.sleep_game.clone(),
        ))
    }

    pub fn lookup(&self) -> &StreamLookup {
        &self.inner.lookup
    }

    pub fn channel(&self) -> &str {
        &self.inner.channel
    }

    pub fn sleep_game(&self) -> &str {
        &self.inner.sleep_game
    }
}
