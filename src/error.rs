//! Error types returned by the client.

use std::time::Duration;
use thiserror::Error;

use crate::response::ResponseFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to parse {format} response: {message}")]
    Parse {
        format: ResponseFormat,
        message: String,
    },

    /// The handshake secret was not found for the session, so the
    /// access token exchange cannot be signed.
    #[error("no `{key}` stored for session `{session_id}`")]
    MissingSessionState { session_id: String, key: String },

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("service `{0}` has no provider attached")]
    NoProvider(String),

    #[error("service `{0}` is read-only")]
    ReadOnly(String),

    /// Domain error raised by a provider implementation.
    #[error("provider error: {0}")]
    Provider(String),
}

impl Error {
    pub(crate) fn parse(format: ResponseFormat, message: impl Into<String>) -> Self {
        Error::Parse {
            format,
            message: message.into(),
        }
    }

    /// True when the failure happened on the wire rather than in this crate.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(String),
}

#[test]
fn test_error_display() {
    let e = Error::from(TransportError::Status {
        status: 401,
        body: "oauth_problem=signature_invalid".into(),
    });
    assert!(e.is_transport());
    assert_eq!(e.to_string(), "transport error: unexpected status 401");

    let e = Error::MissingSessionState {
        session_id: "abc".into(),
        key: "oauth_token_secret".into(),
    };
    assert!(!e.is_transport());
    assert_eq!(
        e.to_string(),
        "no `oauth_token_secret` stored for session `abc`"
    );
}
