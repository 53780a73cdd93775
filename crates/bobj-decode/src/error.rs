//! Decode errors.

use thiserror::Error;

use crate::DecodeState;

/// Errors produced while decoding a BOBJ stream.
///
/// Every variant is terminal: a decoder that returned one of these will not
/// produce mesh buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The index width byte was not 1, 2 or 4.
    #[error("malformed header: index width {0} is not 1, 2 or 4")]
    MalformedHeader(u8),

    /// The stream ended before every declared byte arrived.
    #[error("stream ended in state {state:?} after {consumed} bytes")]
    IncompleteStream { state: DecodeState, consumed: u64 },

    /// Bytes arrived after the last declared index.
    #[error("{0} bytes of trailing data after the mesh payload")]
    TrailingData(usize),

    /// A declared buffer size exceeds the configured limit.
    #[error("{what} count {declared} exceeds the limit of {limit}")]
    MeshTooLarge {
        what: &'static str,
        declared: u32,
        limit: u32,
    },

    /// The decoder was fed after it had already failed.
    #[error("decoder already failed")]
    Poisoned,
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
