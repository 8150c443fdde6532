//! Proxy startup errors with miette diagnostics.
//!
//! Request-time failures never reach this type; the handler turns them into
//! 502 responses.

use miette::Diagnostic;
use thiserror::Error;

use stockdash_config::ConfigError;

#[derive(Debug, Error, Diagnostic)]
pub enum ProxyError {
    #[error("No Twitch credentials available")]
    #[diagnostic(
        code(sleep_proxy::no_credentials),
        help(
            "Set TWITCH_CLIENT_ID and TWITCH_CLIENT_SECRET, store them in the system keyring,\n\
             or add client_id / client_secret to the [proxy] table of the config file."
        )
    )]
    NoCredentials {
        #[source]
        source: ConfigError,
    },

    #[error("Invalid configuration")]
    #[diagnostic(code(sleep_proxy::config))]
    Config {
        #[source]
        source: ConfigError,
    },

    #[error("Could not build the Twitch client")]
    #[diagnostic(code(sleep_proxy::client))]
    Client(#[from] stockdash_api::Error),

    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(sleep_proxy::bind),
        help("Is another process using the port? Pick another with --bind.")
    )]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error")]
    #[diagnostic(code(sleep_proxy::serve))]
    Serve(#[source] std::io::Error),
}

impl From<ConfigError> for ProxyError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { .. } => Self::NoCredentials { source: err },
            other => Self::Config { source: other },
        }
    }
}
