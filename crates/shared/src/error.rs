use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationError;

pub const NO_RESPONSE_MESSAGE: &str = "No response received from the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Server,
    ServerGeneric,
    NoResponse,
    RequestSetup,
    InvalidResponse,
}

/// Remote operation a failure belongs to; picks the generic failure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    ListPage,
    Detail,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create reservation",
            Self::ListPage => "Failed to fetch reservations",
            Self::Detail => "Failed to fetch reservation details",
            Self::Update => "Failed to update reservation",
            Self::Delete => "Failed to delete reservation.",
        }
    }
}

/// Classified failure of a reservation operation. Callers are expected to
/// match exhaustively; no variant implies a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("server rejected the request ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("server rejected the request ({status})")]
    ServerGeneric { status: u16 },
    #[error("no response from server: {detail}")]
    NoResponse { detail: String },
    #[error("could not set up request: {detail}")]
    RequestSetup { detail: String },
    #[error("unexpected response body ({status}): {detail}")]
    InvalidResponse { status: u16, detail: String },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::ServerGeneric { .. } => ErrorKind::ServerGeneric,
            Self::NoResponse { .. } => ErrorKind::NoResponse,
            Self::RequestSetup { .. } => ErrorKind::RequestSetup,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    /// True when the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RequestSetup { .. })
    }

    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::ServerGeneric { .. } => operation.failure_message().to_string(),
            Self::NoResponse { .. } => NO_RESPONSE_MESSAGE.to_string(),
            Self::RequestSetup { detail } => format!("Error in setting up the request: {detail}"),
            Self::InvalidResponse { detail, .. } => {
                format!("Unexpected response from the server: {detail}")
            }
        }
    }
}
