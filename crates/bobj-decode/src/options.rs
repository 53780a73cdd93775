//! Decoder configuration.

/// What to do with an index width byte other than 1, 2 or 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexWidthPolicy {
    /// Fail with [`DecodeError::MalformedHeader`](crate::DecodeError::MalformedHeader).
    #[default]
    Strict,
    /// Treat the indices as 4 bytes wide.
    FallbackToU32,
}

/// What to do with bytes that arrive after the last declared index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingDataPolicy {
    /// Drop them. The caller learns how many were dropped from
    /// [`Status::Complete`](crate::Status::Complete).
    #[default]
    Ignore,
    /// Fail with [`DecodeError::TrailingData`](crate::DecodeError::TrailingData).
    Reject,
}

/// Upper bounds on the buffer sizes a header may declare.
///
/// Buffers are allocated up front from the header, so these cap the memory a
/// single stream can claim before any payload arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_vertex_words: u32,
    pub max_indices: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_vertex_words: 64 << 20,
            max_indices: 64 << 20,
        }
    }
}

impl DecodeLimits {
    /// No limits beyond what the header format can express.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_vertex_words: u32::MAX,
            max_indices: u32::MAX,
        }
    }
}

/// Options for a single decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub index_width: IndexWidthPolicy,
    pub trailing_data: TrailingDataPolicy,
    pub limits: DecodeLimits,
}

impl DecodeOptions {
    #[must_use]
    pub fn with_index_width(mut self, policy: IndexWidthPolicy) -> Self {
        self.index_width = policy;
        self
    }

    #[must_use]
    pub fn with_trailing_data(mut self, policy: TrailingDataPolicy) -> Self {
        self.trailing_data = policy;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }
}
