use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when an admin call is attempted without a stored token.
pub const AUTH_REQUIRED_MESSAGE: &str = "尚未登录或登录已过期";

/// ClientError
///
/// Every failure a content client call can produce. Callers branch on the
/// variant; the `Display` text is the message meant for the reader.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token in storage. Raised before any request is sent.
    #[error("{}", AUTH_REQUIRED_MESSAGE)]
    AuthenticationRequired,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    RequestFailed { status: StatusCode, message: String },

    /// HTTP 409 on tag deletion: the tag still has sub-tags or articles.
    #[error("{message}")]
    Conflict { message: String },

    /// The view that issued the request went away before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// Connection, timeout or protocol failure below HTTP status level.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success body without the expected shape, or a JSON payload that
    /// could not be encoded.
    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token storage could not be read or written.
    #[error("token storage error: {0}")]
    Storage(String),

    /// The client could not be constructed from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the backend produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            ClientError::Conflict { .. } => Some(StatusCode::CONFLICT),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
