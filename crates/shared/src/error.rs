use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FALLBACK_APPLICATION_MESSAGE: &str = "Request failed";

/// Failure the server reported inside a well-formed `{error: true}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{msg}")]
pub struct ApplicationError {
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ApplicationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            title: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("response body is not valid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response body is not a json object")]
    NotAnObject,
    #[error("response is missing field `{0}`")]
    MissingField(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized transfer token `{0}`")]
pub struct ParseTokenError(pub String);
