// stockdash-api: async HTTP clients for the portfolio feed, the sleep-status
// proxy, and the Twitch OAuth + Helix APIs.

pub mod cache_bust;
pub mod error;
pub mod feed;
pub mod sleep;
pub mod transport;
pub mod twitch;

pub use error::Error;
pub use feed::FeedClient;
pub use feed::types::{
    AccountRecord, ActivityRecord, EquitySampleRecord, FlexNumber, FlexTimestamp, PortfolioFeed,
    PositionRecord,
};
pub use sleep::{SleepProxyClient, SleepStatus};
pub use transport::{TlsMode, TransportConfig};
pub use twitch::{AccessToken, HelixConfig, StreamLookup, StreamRecord, TokenManager};
