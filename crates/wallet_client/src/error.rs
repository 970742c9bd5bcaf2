use shared::{
    domain::ActionKind,
    error::{ApplicationError, EnvelopeError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url `{url}`: {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed response from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: EnvelopeError,
    },
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0} is already in flight")]
    AlreadyInFlight(ActionKind),
    #[error("server rejected {kind}: {source}")]
    Application {
        kind: ActionKind,
        #[source]
        source: ApplicationError,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ActionError {
    /// Message the server supplied, when it rejected the action itself.
    pub fn application_message(&self) -> Option<&str> {
        match self {
            ActionError::Application { source, .. } => Some(source.msg.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("login was rejected for {0}")]
    Rejected(String),
    #[error("account creation was rejected for {0}")]
    AccountRejected(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
