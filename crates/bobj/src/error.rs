//! Client errors.

use bobj_decode::DecodeError;
use thiserror::Error;

/// Errors from fetching or decoding a mesh.
///
/// Fetch failures ([`Http`](Self::Http), [`Status`](Self::Status),
/// [`MissingBody`](Self::MissingBody), [`Io`](Self::Io)) are kept apart from
/// decode failures ([`Decode`](Self::Decode)). Every variant names the asset
/// it came from.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The server answered without a body.
    #[error("response from {url} has no body")]
    MissingBody { url: String },

    /// A local file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The stream arrived but is not a valid mesh.
    #[error("failed to decode {source_id}: {source}")]
    Decode {
        source_id: String,
        #[source]
        source: DecodeError,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn decode(source_id: &str, source: DecodeError) -> Self {
        Self::Decode {
            source_id: source_id.to_owned(),
            source,
        }
    }

    /// Whether the failure happened while fetching rather than decoding.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Decode { .. })
    }

    /// The decode failure, if this is one.
    #[must_use]
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
