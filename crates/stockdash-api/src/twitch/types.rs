use serde::Deserialize;

/// Body of a successful client-credentials grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `GET /helix/streams` envelope. Offline channels return an empty `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct StreamsResponse {
    #[serde(default)]
    pub data: Vec<StreamRecord>,
}

/// One entry of the Helix streams list. Only the fields the sleep check
/// reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user_login: String,
}

impl StreamRecord {
    pub fn is_live(&self) -> bool {
        self.stream_type == "live"
    }
}
