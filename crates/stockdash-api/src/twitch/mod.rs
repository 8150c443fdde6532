// Twitch OAuth + Helix client
//
// App-access tokens come from the client-credentials grant and are cached
// by `TokenManager`; `StreamLookup` queries Helix with that token and
// retries exactly once when Helix rejects it.

mod streams;
mod token;
mod types;

use secrecy::SecretString;
use url::Url;

pub use streams::StreamLookup;
pub use token::{AccessToken, EXPIRY_MARGIN_SECS, TokenManager};
pub use types::StreamRecord;

/// Default identity endpoint for the client-credentials grant.
pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
/// Default Helix API base. Must end with `/` so relative joins keep the path.
pub const DEFAULT_API_BASE: &str = "https://api.twitch.tv/helix/";

/// Credentials and endpoints for talking to Twitch.
#[derive(Debug, Clone)]
pub struct HelixConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub token_url: Url,
    pub api_base: Url,
}

impl HelixConfig {
    /// Config pointing at the public Twitch endpoints.
    pub fn new(client_id: String, client_secret: SecretString) -> Result<Self, crate::Error> {
        Ok(Self {
            client_id,
            client_secret,
            token_url: Url::parse(DEFAULT_TOKEN_URL)?,
            api_base: Url::parse(DEFAULT_API_BASE)?,
        })
    }
}
